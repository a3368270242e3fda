// Utils compartidos

pub mod constants;
pub mod storage;
pub mod cancel;
pub mod keycloak_ffi;

pub use constants::*;
pub use storage::*;
pub use cancel::CancelToken;
