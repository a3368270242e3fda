// ============================================================================
// HELPDESK APP - FRONTEND MVVM (RUST PURO)
// ============================================================================
// Arquitectura MVVM:
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Lógica UI, únicos escritores de sus stores
// - Services: SOLO comunicación HTTP / proveedor de identidad
// - State: Stores con Rc<RefCell> + subscribers
// - Router: rutas, guards por dominio y navegación
// - Models: Estructuras compartidas con backend
// ============================================================================

mod app;
mod config;
mod dom;
mod error;
mod models;
mod router;
mod services;
mod state;
mod utils;
mod viewmodels;
mod views;

use std::cell::{Cell, RefCell};

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_logger::Config;

use crate::app::App;
use crate::config::CONFIG;
use crate::dom::on_window_event;
use crate::router::current_route;
use crate::utils::ROUTE_CHANGE_EVENT;

// Instancia global de App (el único estado thread-local)
thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    static RENDER_SCHEDULED: Cell<bool> = const { Cell::new(false) };
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Inicializar panic hook para mejor debugging
    console_error_panic_hook::set_once();

    wasm_logger::init(Config::new(CONFIG.log_level()));
    log::info!("🚀 Helpdesk App - Rust Puro + MVVM");

    let app = App::new()?;
    app.start();
    app.render()?;

    APP.with(|app_cell| {
        *app_cell.borrow_mut() = Some(app);
    });

    // Listeners globales: se registran UNA VEZ aquí
    on_window_event(ROUTE_CHANGE_EVENT, |_| sync_route())?;
    on_window_event("popstate", |_| sync_route())?;

    Ok(())
}

/// Re-render agrupado: varias notificaciones seguidas = un solo render
pub fn schedule_rerender() {
    if RENDER_SCHEDULED.with(|flag| flag.replace(true)) {
        return;
    }
    Timeout::new(0, || {
        RENDER_SCHEDULED.with(|flag| flag.set(false));
        rerender_app();
    })
    .forget();
}

/// Re-render completo
pub fn rerender_app() {
    APP.with(|app_cell| match app_cell.borrow().as_ref() {
        Some(app) => {
            if let Err(e) = app.render() {
                log::error!("❌ [RERENDER] Error re-renderizando: {:?}", e);
            }
        }
        None => log::warn!("⚠️ [RERENDER] App no está inicializada"),
    });
}

/// La URL cambió: montar la nueva ruta fuera del render en curso
fn sync_route() {
    Timeout::new(0, || {
        APP.with(|app_cell| {
            if let Some(app) = app_cell.borrow().as_ref() {
                app.navigate_to(current_route());
            }
        });
        rerender_app();
    })
    .forget();
}

/// Re-render llamable desde JavaScript
#[wasm_bindgen]
pub fn rerender_app_wasm() {
    rerender_app();
}
