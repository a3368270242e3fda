pub mod http;
pub mod adapter;
pub mod identity;
pub mod ticket_api;
pub mod admin_api;

pub use http::Method;
pub use adapter::HttpAdapter;
pub use identity::{IdentityProvider, KeycloakProvider, UnavailableProvider};
pub use ticket_api::PublicApi;
pub use admin_api::{AdminApi, AdminListScope};
