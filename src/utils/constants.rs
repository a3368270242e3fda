/// Clave de localStorage con el token admin (ausente ⇒ no autenticado)
pub const STORAGE_KEY_ADMIN_TOKEN: &str = "admin_token";

/// Evento global que dispara un re-render tras navegar con history.pushState
pub const ROUTE_CHANGE_EVENT: &str = "routechange";

/// Id del contenedor raíz en index.html
pub const APP_ROOT_ID: &str = "app";
