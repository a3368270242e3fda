// ============================================================================
// APP VIEW - Qué se pinta para cada ruta (después del guard)
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::app::AppContext;
use crate::router::{Domain, Route};
use crate::views::admin_tickets::{render_admin_detail, render_admin_list};
use crate::views::dashboard::render_dashboard;
use crate::views::layout::{render_loading, render_not_found, render_shell};
use crate::views::login::{render_admin_login, render_login};
use crate::views::tickets::{render_submit_page, render_ticket_detail, render_tickets_page};

/// Ruta ya autorizada (o pública)
pub fn render_route(ctx: &AppContext, route: &Route, return_to: Route) -> Result<Element, JsValue> {
    match route {
        Route::Login => render_login(ctx, return_to),
        Route::AdminLogin => render_admin_login(ctx),
        Route::Dashboard => render_shell(ctx, Domain::Public, render_dashboard(ctx)?),
        Route::SubmitTicket => render_shell(ctx, Domain::Public, render_submit_page(ctx)?),
        Route::Tickets => render_shell(ctx, Domain::Public, render_tickets_page(ctx)?),
        Route::TicketDetail(id) => render_shell(ctx, Domain::Public, render_ticket_detail(ctx, id)?),
        Route::AdminTickets | Route::AdminUnclaimed | Route::AdminMyClaims => {
            render_shell(ctx, Domain::Admin, render_admin_list(ctx)?)
        }
        Route::AdminTicketDetail(id) => render_shell(ctx, Domain::Admin, render_admin_detail(ctx, *id)?),
        Route::NotFound(path) => render_not_found(path),
    }
}

/// Guard en estado Checking: ni contenido ni redirección
pub fn render_pending() -> Result<Element, JsValue> {
    render_loading("Checking session…")
}
