// ============================================================================
// TICKET VIEWS - Filtros, listas, formulario de alta y detalle
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::app::AppContext;
use crate::dom::{clear_field, field_value, on_change, on_submit, ElementBuilder};
use crate::models::{Comment, Ticket, TicketStatus};
use crate::router::{navigate, Route};
use crate::state::{comment_thread, StatusFilter, StorePhase, TicketFilter, TicketPage};
use crate::views::layout::{format_date, render_empty, render_loading, render_notice, status_badge};

const SEARCH_INPUT_ID: &str = "ticket-search";
const STATUS_SELECT_ID: &str = "ticket-status-filter";

/// Búsqueda por título + estado. Se aplica en "change" (no en cada tecla).
pub fn render_filter_bar(ctx: &AppContext) -> Result<Element, JsValue> {
    let filter = ctx.state.filter();

    let search = ElementBuilder::new("input")?
        .id(SEARCH_INPUT_ID)?
        .attr("type", "search")?
        .attr("placeholder", "Search by title")?
        .attr("value", &filter.search)?
        .build();

    let mut options = vec![ElementBuilder::new("option")?
        .attr("value", "")?
        .flag("selected", filter.status.value().is_empty())?
        .text("All statuses")
        .build()];
    for status in TicketStatus::ALL {
        options.push(
            ElementBuilder::new("option")?
                .attr("value", status.label())?
                .flag("selected", filter.status.value() == status.label())?
                .text(status.label())
                .build(),
        );
    }
    let select = ElementBuilder::new("select")?
        .id(STATUS_SELECT_ID)?
        .children(options)?
        .build();

    for element in [&search, &select] {
        let state = ctx.state.clone();
        on_change(element, move |_| {
            state.set_filter(TicketFilter {
                search: field_value(SEARCH_INPUT_ID),
                status: StatusFilter::from_value(&field_value(STATUS_SELECT_ID)),
            });
        })?;
    }

    Ok(ElementBuilder::new("div")?
        .class("filter-bar")
        .child(search)?
        .child(select)?
        .build())
}

fn render_ticket_row(ticket: &Ticket) -> Result<Element, JsValue> {
    let route = Route::TicketDetail(ticket.id.clone());
    Ok(ElementBuilder::new("li")?
        .class("ticket-row")
        .child(ElementBuilder::new("span")?.class("ticket-title").text(&ticket.title).build())?
        .child(status_badge(ticket.status.label())?)?
        .child(
            ElementBuilder::new("span")?
                .class("ticket-date")
                .text(&format_date(&ticket.created_at))
                .build(),
        )?
        .on_click(move |_| navigate(&route))?
        .build())
}

pub fn render_ticket_list(ctx: &AppContext, tickets: &[Rc<Ticket>]) -> Result<Element, JsValue> {
    if tickets.is_empty() {
        if ctx.state.tickets.phase() == StorePhase::Loading {
            return render_loading("Loading tickets…");
        }
        return render_empty("No tickets found");
    }
    let rows = tickets
        .iter()
        .map(|ticket| render_ticket_row(ticket))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ElementBuilder::new("ul")?.class("ticket-list").children(rows)?.build())
}

/// "Mis tickets": lista completa filtrada
pub fn render_tickets_page(ctx: &AppContext) -> Result<Element, JsValue> {
    let tickets = ctx.state.filtered_tickets();
    Ok(ElementBuilder::new("section")?
        .class("tickets-page")
        .child(ElementBuilder::new("h2")?.text("My tickets").build())?
        .child(render_filter_bar(ctx)?)?
        .child(render_ticket_list(ctx, &tickets)?)?
        .build())
}

const TITLE_INPUT_ID: &str = "new-ticket-title";
const DESCRIPTION_INPUT_ID: &str = "new-ticket-description";

/// Alta de ticket. Sin escritura optimista: solo se añade al store si el
/// backend lo crea.
pub fn render_ticket_form(ctx: &AppContext) -> Result<Element, JsValue> {
    let submitting = ctx.state.is_submitting();
    let form = ElementBuilder::new("form")?
        .class("ticket-form")
        .child(ElementBuilder::new("h3")?.text("Submit a ticket").build())?
        .child(
            ElementBuilder::new("input")?
                .id(TITLE_INPUT_ID)?
                .attr("placeholder", "Title")?
                .build(),
        )?
        .child(
            ElementBuilder::new("textarea")?
                .id(DESCRIPTION_INPUT_ID)?
                .attr("placeholder", "Describe the problem")?
                .attr("rows", "4")?
                .build(),
        )?
        .child(
            ElementBuilder::new("button")?
                .class("btn-primary")
                .attr("type", "submit")?
                .flag("disabled", submitting)?
                .text(if submitting { "Submitting…" } else { "Submit" })
                .build(),
        )?
        .build();

    let ctx = ctx.clone();
    on_submit(&form, move || {
        let title = field_value(TITLE_INPUT_ID);
        let description = field_value(DESCRIPTION_INPUT_ID);
        if title.trim().is_empty() {
            ctx.state.set_notice(Some("Title is required".to_string()));
            return;
        }
        if ctx.state.is_submitting() {
            return;
        }

        let ctx = ctx.clone();
        ctx.state.set_submitting(true);
        spawn_local(async move {
            match ctx.tickets.create_ticket(&title, &description).await {
                Ok(ticket) => {
                    clear_field(TITLE_INPUT_ID);
                    clear_field(DESCRIPTION_INPUT_ID);
                    log::info!("📝 [TICKETS] Formulario enviado ({})", ticket.id);
                    ctx.state.set_notice(None);
                }
                Err(e) => ctx.state.set_notice(Some(e.to_string())),
            }
            ctx.state.set_submitting(false);
        });
    })?;

    Ok(form)
}

pub fn render_submit_page(ctx: &AppContext) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("section")?
        .class("submit-page")
        .child(render_ticket_form(ctx)?)?
        .build())
}

fn render_comment(comment: &Comment) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("li")?
        .class("comment")
        .child(
            ElementBuilder::new("div")?
                .class("comment-meta")
                .text(&format!("{} · {}", comment.author, format_date(&comment.created_at)))
                .build(),
        )?
        .child(ElementBuilder::new("p")?.text(&comment.text).build())?
        .build())
}

const COMMENT_INPUT_ID: &str = "comment-text";

fn render_comment_form(ctx: &AppContext, ticket_id: &str) -> Result<Element, JsValue> {
    let form = ElementBuilder::new("form")?
        .class("comment-form")
        .child(
            ElementBuilder::new("textarea")?
                .id(COMMENT_INPUT_ID)?
                .attr("placeholder", "Add a comment")?
                .attr("rows", "3")?
                .build(),
        )?
        .child(
            ElementBuilder::new("button")?
                .class("btn-primary")
                .attr("type", "submit")?
                .text("Comment")
                .build(),
        )?
        .build();

    let ctx = ctx.clone();
    let ticket_id = ticket_id.to_string();
    on_submit(&form, move || {
        let text = field_value(COMMENT_INPUT_ID);
        if text.trim().is_empty() {
            return;
        }
        let ctx = ctx.clone();
        let ticket_id = ticket_id.clone();
        spawn_local(async move {
            match ctx.tickets.add_comment(&ticket_id, &text).await {
                Ok(comment) => {
                    clear_field(COMMENT_INPUT_ID);
                    // La página de detalle también lleva su copia
                    let mut page = ctx.state.ticket_page();
                    if let Some(ticket) = page.ticket.as_mut().filter(|t| t.id == comment.ticket_id) {
                        ticket.comments.push(comment);
                        ctx.state.set_ticket_page(page);
                    }
                    ctx.state.set_notice(None);
                }
                Err(e) => ctx.state.set_notice(Some(e.to_string())),
            }
        });
    })?;
    Ok(form)
}

pub fn render_ticket_detail(ctx: &AppContext, ticket_id: &str) -> Result<Element, JsValue> {
    let TicketPage { ticket, loading, error } = ctx.state.ticket_page();
    let cached = ctx.state.tickets.state().find(ticket_id).cloned();

    let ticket = match (ticket, cached.as_deref()) {
        (Some(ticket), _) => ticket,
        (None, Some(cached)) => cached.clone(),
        (None, None) if loading => return render_loading("Loading ticket…"),
        (None, None) => {
            let message = error.unwrap_or_else(|| "Ticket not found".to_string());
            return render_notice(&message);
        }
    };

    // El store manda si tiene el ticket (recoge comentarios recién enviados)
    let comments = if cached.is_some() {
        comment_thread(&ctx.state.tickets.state(), ticket_id)
    } else {
        ticket.comments.clone()
    };
    let comment_items = comments
        .iter()
        .map(render_comment)
        .collect::<Result<Vec<_>, _>>()?;
    let thread = if comment_items.is_empty() {
        render_empty("No comments yet")?
    } else {
        ElementBuilder::new("ul")?.class("comment-thread").children(comment_items)?.build()
    };

    Ok(ElementBuilder::new("article")?
        .class("ticket-detail")
        .child(ElementBuilder::new("h2")?.text(&ticket.title).build())?
        .child(status_badge(ticket.status.label())?)?
        .child(
            ElementBuilder::new("p")?
                .class("ticket-date")
                .text(&format!("Opened {}", format_date(&ticket.created_at)))
                .build(),
        )?
        .child(ElementBuilder::new("p")?.class("ticket-description").text(&ticket.description).build())?
        .child(ElementBuilder::new("h3")?.text("Comments").build())?
        .child(thread)?
        .child(render_comment_form(ctx, ticket_id)?)?
        .build())
}
