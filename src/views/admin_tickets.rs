// ============================================================================
// ADMIN VIEWS - Lista de soporte (claim) y detalle con sugerencias
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::app::AppContext;
use crate::dom::{clear_field, field_value, on_change, on_submit, ElementBuilder};
use crate::models::{AdminComment, AdminTicket, AdminTicketStatus, Suggestion, VectorSuggestions};
use crate::router::{navigate, Route};
use crate::services::AdminListScope;
use crate::views::layout::{format_date, render_empty, render_loading, render_notice, status_badge};

fn claim_button(ctx: &AppContext, id: i64) -> Result<Element, JsValue> {
    let ctx = ctx.clone();
    ElementBuilder::new("button")?
        .class("btn-claim")
        .text("Claim")
        .on_click(move |e| {
            e.stop_propagation();
            let ctx = ctx.clone();
            spawn_local(async move {
                if let Err(e) = ctx.admin.claim(id).await {
                    ctx.state.set_notice(Some(e.to_string()));
                }
            });
        })
        .map(|builder| builder.build())
}

fn render_admin_row(ctx: &AppContext, ticket: &AdminTicket) -> Result<Element, JsValue> {
    let assignee = match ticket.engineer_id {
        Some(engineer) => ElementBuilder::new("span")?
            .class("assignee")
            .text(&format!("Engineer #{}", engineer))
            .build(),
        None => claim_button(ctx, ticket.id)?,
    };

    let route = Route::AdminTicketDetail(ticket.id);
    Ok(ElementBuilder::new("tr")?
        .class("admin-row")
        .child(ElementBuilder::new("td")?.text(&format!("#{}", ticket.id)).build())?
        .child(ElementBuilder::new("td")?.class("ticket-title").text(&ticket.title).build())?
        .child(ElementBuilder::new("td")?.child(status_badge(ticket.status.label())?)?.build())?
        .child(ElementBuilder::new("td")?.text(&format_date(&ticket.created_at)).build())?
        .child(ElementBuilder::new("td")?.child(assignee)?.build())?
        .on_click(move |_| navigate(&route))?
        .build())
}

pub fn scope_title(scope: AdminListScope) -> &'static str {
    match scope {
        AdminListScope::All => "All tickets",
        AdminListScope::Unclaimed => "Unclaimed tickets",
        AdminListScope::Mine => "My claims",
    }
}

pub fn render_admin_list(ctx: &AppContext) -> Result<Element, JsValue> {
    let list = ctx.admin.store().list();

    let body = if let Some(error) = list.error.as_deref() {
        render_notice(error)?
    } else if list.loading && list.tickets.is_empty() {
        render_loading("Loading tickets…")?
    } else if list.tickets.is_empty() {
        render_empty("No tickets")?
    } else {
        let rows = list
            .tickets
            .iter()
            .map(|ticket| render_admin_row(ctx, ticket))
            .collect::<Result<Vec<_>, _>>()?;
        ElementBuilder::new("table")?
            .class("admin-table")
            .child(ElementBuilder::new("tbody")?.children(rows)?.build())?
            .build()
    };

    Ok(ElementBuilder::new("section")?
        .class("admin-list")
        .child(ElementBuilder::new("h2")?.text(scope_title(list.scope)).build())?
        .child(body)?
        .build())
}

fn render_status_select(ctx: &AppContext, id: i64, current: AdminTicketStatus) -> Result<Element, JsValue> {
    let options = AdminTicketStatus::ALL
        .into_iter()
        .map(|status| -> Result<Element, JsValue> {
            Ok(ElementBuilder::new("option")?
                .attr("value", status.label())?
                .flag("selected", status == current)?
                .text(status.label())
                .build())
        })
        .collect::<Result<Vec<_>, _>>()?;
    let select = ElementBuilder::new("select")?
        .id("admin-status")?
        .children(options)?
        .build();

    let ctx = ctx.clone();
    on_change(&select, move |_| {
        let Some(status) = AdminTicketStatus::from_label(&field_value("admin-status")) else {
            return;
        };
        let ctx = ctx.clone();
        spawn_local(async move {
            // el aviso queda en la página (AdminTicketPage::notice)
            let _ = ctx.admin.update_status(id, status).await;
        });
    })?;
    Ok(select)
}

fn render_admin_comment(comment: &AdminComment) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("li")?
        .class("comment")
        .child(
            ElementBuilder::new("div")?
                .class("comment-meta")
                .text(&format!("User #{} · {}", comment.author_id, format_date(&comment.created_at)))
                .build(),
        )?
        .child(ElementBuilder::new("p")?.text(&comment.text).build())?
        .build())
}

fn render_admin_comment_form(ctx: &AppContext, id: i64) -> Result<Element, JsValue> {
    let form = ElementBuilder::new("form")?
        .class("comment-form")
        .child(
            ElementBuilder::new("textarea")?
                .id("admin-comment-text")?
                .attr("rows", "3")?
                .attr("placeholder", "Reply to the user")?
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
    on_submit(&form, move || {
        let text = field_value("admin-comment-text");
        if text.trim().is_empty() {
            return;
        }
        let ctx = ctx.clone();
        spawn_local(async move {
            if ctx.admin.add_comment(id, &text).await.is_ok() {
                clear_field("admin-comment-text");
            }
        });
    })?;
    Ok(form)
}

fn render_suggestion(suggestion: &Suggestion) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("li")?
        .class("suggestion")
        .child(ElementBuilder::new("code")?.text(&suggestion.error_snippet).build())?
        .child(ElementBuilder::new("p")?.text(&suggestion.suggestion_text).build())?
        .build())
}

fn render_vector_suggestions(suggestions: &VectorSuggestions, loading: bool) -> Result<Element, JsValue> {
    if loading {
        return render_loading("Looking for similar tickets…");
    }
    if suggestions.is_empty() {
        return render_empty("No suggestions");
    }

    let mut items = Vec::new();
    for past in &suggestions.past {
        items.push(
            ElementBuilder::new("li")?
                .class("suggestion suggestion-past")
                .child(
                    ElementBuilder::new("a")?
                        .attr("href", &Route::AdminTicketDetail(past.ticket_id).path())?
                        .text(&format!("Ticket #{} (solved {})", past.ticket_id, format_date(&past.solved_at)))
                        .build(),
                )?
                .child(ElementBuilder::new("p")?.text(&past.snippet).build())?
                .build(),
        );
    }
    for doc in &suggestions.docs {
        let heading = match &doc.section_heading {
            Some(section) => format!("{} › {}", doc.filename, section),
            None => doc.filename.clone(),
        };
        items.push(
            ElementBuilder::new("li")?
                .class("suggestion suggestion-doc")
                .child(ElementBuilder::new("strong")?.text(&heading).build())?
                .child(ElementBuilder::new("p")?.text(&doc.snippet).build())?
                .build(),
        );
    }
    Ok(ElementBuilder::new("ul")?.class("suggestions").children(items)?.build())
}

fn render_search(ctx: &AppContext) -> Result<Element, JsValue> {
    let page = ctx.admin.store().page();
    let form = ElementBuilder::new("form")?
        .class("search-form")
        .child(
            ElementBuilder::new("input")?
                .id("admin-search")?
                .attr("type", "search")?
                .attr("placeholder", "Search past solutions")?
                .attr("value", &page.search_query)?
                .build(),
        )?
        .child(
            ElementBuilder::new("button")?
                .attr("type", "submit")?
                .text("Search")
                .build(),
        )?
        .build();

    let ctx_submit = ctx.clone();
    on_submit(&form, move || {
        let query = field_value("admin-search");
        let ctx = ctx_submit.clone();
        spawn_local(async move {
            let cancel = ctx.state.mount_token();
            ctx.admin.search(&query, Some(&cancel)).await;
        });
    })?;

    let results = page
        .search_results
        .iter()
        .map(render_suggestion)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ElementBuilder::new("div")?
        .class("suggestion-search")
        .child(form)?
        .child(ElementBuilder::new("ul")?.class("suggestions").children(results)?.build())?
        .build())
}

pub fn render_admin_detail(ctx: &AppContext, id: i64) -> Result<Element, JsValue> {
    let page = ctx.admin.store().page();
    let ticket = match (page.ticket.as_ref(), page.error.as_deref()) {
        (Some(ticket), _) => ticket,
        (None, Some(error)) => return render_notice(error),
        (None, None) => return render_loading("Loading ticket…"),
    };

    let mut header = ElementBuilder::new("div")?
        .class("detail-header")
        .child(ElementBuilder::new("h2")?.text(&format!("#{} {}", ticket.id, ticket.title)).build())?
        .child(render_status_select(ctx, id, ticket.status)?)?;
    if ticket.engineer_id.is_none() {
        header = header.child(claim_button(ctx, id)?)?;
    }

    let comments = ticket
        .comments
        .iter()
        .map(render_admin_comment)
        .collect::<Result<Vec<_>, _>>()?;
    let inline = ticket
        .suggestions
        .iter()
        .map(render_suggestion)
        .collect::<Result<Vec<_>, _>>()?;

    let mut article = ElementBuilder::new("article")?
        .class("admin-detail")
        .child(header.build())?;
    if let Some(notice) = page.notice.as_deref() {
        article = article.child(render_notice(notice)?)?;
    }
    Ok(article
        .child(
            ElementBuilder::new("p")?
                .class("ticket-date")
                .text(&format!("User #{} · opened {}", ticket.user_id, format_date(&ticket.created_at)))
                .build(),
        )?
        .child(ElementBuilder::new("p")?.class("ticket-description").text(&ticket.description).build())?
        .child(ElementBuilder::new("h3")?.text("Comments").build())?
        .child(ElementBuilder::new("ul")?.class("comment-thread").children(comments)?.build())?
        .child(render_admin_comment_form(ctx, id)?)?
        .child(ElementBuilder::new("h3")?.text("Suggestions").build())?
        .child(ElementBuilder::new("ul")?.class("suggestions").children(inline)?.build())?
        .child(render_vector_suggestions(&page.suggestions, page.suggestions_loading)?)?
        .child(render_search(ctx)?)?
        .build())
}
