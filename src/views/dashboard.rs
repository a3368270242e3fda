// ============================================================================
// DASHBOARD VIEW - Resumen, tickets recientes y alta rápida
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::app::AppContext;
use crate::config::CONFIG;
use crate::dom::ElementBuilder;
use crate::state::{recent_tickets, status_counts, StatusCounts};
use crate::views::tickets::{render_filter_bar, render_ticket_form, render_ticket_list};

fn render_counts(counts: StatusCounts) -> Result<Element, JsValue> {
    let tiles = [
        ("Total", counts.total()),
        ("Open", counts.open),
        ("In Progress", counts.in_progress),
        ("Closed", counts.closed),
    ]
    .into_iter()
    .map(|(label, value)| -> Result<Element, JsValue> {
        Ok(ElementBuilder::new("div")?
            .class("count-tile")
            .child(ElementBuilder::new("strong")?.text(&value.to_string()).build())?
            .child(ElementBuilder::new("span")?.text(label).build())?
            .build())
    })
    .collect::<Result<Vec<_>, _>>()?;

    Ok(ElementBuilder::new("div")?.class("status-counts").children(tiles)?.build())
}

pub fn render_dashboard(ctx: &AppContext) -> Result<Element, JsValue> {
    let state = ctx.state.tickets.state();
    let filtered = ctx.state.filtered_tickets();
    let recent = recent_tickets(&filtered, CONFIG.recent_tickets_limit);

    Ok(ElementBuilder::new("section")?
        .class("dashboard")
        .child(render_counts(status_counts(&state.tickets))?)?
        .child(
            ElementBuilder::new("div")?
                .class("dashboard-grid")
                .child(
                    ElementBuilder::new("div")?
                        .class("recent-tickets")
                        .child(ElementBuilder::new("h2")?.text("Recent tickets").build())?
                        .child(render_filter_bar(ctx)?)?
                        .child(render_ticket_list(ctx, &recent)?)?
                        .build(),
                )?
                .child(render_ticket_form(ctx)?)?
                .build(),
        )?
        .build())
}
