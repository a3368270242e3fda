// ============================================================================
// NAVIGATION - History API + evento global "routechange"
// ============================================================================

use wasm_bindgen::JsValue;
use web_sys::Event;

use crate::router::route::Route;
use crate::utils::ROUTE_CHANGE_EVENT;

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window"))
}

/// Ruta actual según location.pathname
pub fn current_route() -> Route {
    window()
        .and_then(|w| w.location().pathname())
        .map(|path| Route::parse(&path))
        .unwrap_or(Route::Dashboard)
}

/// location.search (para leer ?return_to=)
pub fn current_search() -> String {
    window()
        .and_then(|w| w.location().search())
        .unwrap_or_default()
}

/// URL absoluta para un path de la app (redirect URI del proveedor)
pub fn absolute_url(path: &str) -> String {
    let origin = window()
        .and_then(|w| w.location().origin())
        .unwrap_or_default();
    format!("{}{}", origin, path)
}

pub fn navigate(route: &Route) {
    if let Err(e) = change_location(&route.path(), false) {
        log::error!("❌ [ROUTER] No se pudo navegar a {}: {:?}", route.path(), e);
    }
}

/// Igual que navigate pero sin nueva entrada de historial (redirecciones)
pub fn redirect(path: &str) {
    if let Err(e) = change_location(path, true) {
        log::error!("❌ [ROUTER] No se pudo redirigir a {}: {:?}", path, e);
    }
}

fn change_location(path: &str, replace: bool) -> Result<(), JsValue> {
    let window = window()?;
    let history = window.history()?;
    if replace {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))?;
    } else {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))?;
    }
    log::debug!("🧭 [ROUTER] → {}", path);

    let event = Event::new(ROUTE_CHANGE_EVENT)?;
    window.dispatch_event(&event)?;
    Ok(())
}
