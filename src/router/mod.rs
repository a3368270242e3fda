// ============================================================================
// ROUTER MODULE - Rutas, guards y navegación
// ============================================================================

pub mod route;
pub mod guard;
pub mod navigation;

pub use route::{query_param, return_target, Domain, Route};
pub use guard::{GuardOutcome, RouteGuard};
pub use navigation::{absolute_url, current_route, current_search, navigate, redirect};
