// ============================================================================
// LAYOUT - Cabecera, navegación y piezas comunes
// ============================================================================

use chrono::{DateTime, Utc};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::app::AppContext;
use crate::dom::ElementBuilder;
use crate::router::{absolute_url, navigate, Domain, Route};

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

fn nav_link(label: &str, route: Route, current: &Route) -> Result<Element, JsValue> {
    let class = if &route == current { "nav-link active" } else { "nav-link" };
    Ok(ElementBuilder::new("a")?
        .class(class)
        .attr("href", &route.path())?
        .text(label)
        .on_click(move |e| {
            e.prevent_default();
            navigate(&route);
        })?
        .build())
}

fn render_header(ctx: &AppContext, domain: Domain) -> Result<Element, JsValue> {
    let current = ctx.state.current_route();

    let (title, links) = match domain {
        Domain::Public => (
            "Helpdesk",
            vec![
                nav_link("Dashboard", Route::Dashboard, &current)?,
                nav_link("My tickets", Route::Tickets, &current)?,
                nav_link("New ticket", Route::SubmitTicket, &current)?,
            ],
        ),
        Domain::Admin => (
            "Helpdesk · Support",
            vec![
                nav_link("All tickets", Route::AdminTickets, &current)?,
                nav_link("Unclaimed", Route::AdminUnclaimed, &current)?,
                nav_link("My claims", Route::AdminMyClaims, &current)?,
            ],
        ),
    };

    let logout = match domain {
        Domain::Public => {
            let tokens = ctx.state.tokens.clone();
            ElementBuilder::new("button")?
                .class("btn-logout")
                .text("Log out")
                .on_click(move |_| {
                    let tokens = tokens.clone();
                    spawn_local(async move {
                        tokens.logout(Some(&absolute_url(&Route::Login.path()))).await;
                    });
                })?
                .build()
        }
        Domain::Admin => {
            let admin = ctx.admin.clone();
            ElementBuilder::new("button")?
                .class("btn-logout")
                .text("Log out")
                .on_click(move |_| {
                    admin.sign_out();
                    navigate(&Route::AdminLogin);
                })?
                .build()
        }
    };

    Ok(ElementBuilder::new("header")?
        .class("app-header")
        .child(ElementBuilder::new("h1")?.text(title).build())?
        .child(ElementBuilder::new("nav")?.children(links)?.build())?
        .child(logout)?
        .build())
}

/// Cabecera + aviso + contenido
pub fn render_shell(ctx: &AppContext, domain: Domain, content: Element) -> Result<Element, JsValue> {
    let mut shell = ElementBuilder::new("div")?
        .class("app-shell")
        .child(render_header(ctx, domain)?)?;
    if let Some(notice) = ctx.state.notice() {
        shell = shell.child(render_notice(&notice)?)?;
    }
    Ok(shell
        .child(ElementBuilder::new("main")?.class("app-content").child(content)?.build())?
        .build())
}

pub fn render_notice(message: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("notice notice-error")
        .attr("role", "alert")?
        .text(message)
        .build())
}

pub fn render_loading(label: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?.class("loading").text(label).build())
}

pub fn render_empty(label: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("p")?.class("empty").text(label).build())
}

pub fn render_not_found(path: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("not-found")
        .child(ElementBuilder::new("h2")?.text("Page not found").build())?
        .child(ElementBuilder::new("p")?.text(path).build())?
        .child(nav_link("Back to dashboard", Route::Dashboard, &Route::NotFound(path.to_string()))?)?
        .build())
}

/// Etiqueta de estado con clase CSS derivada del texto
pub fn status_badge(label: &str) -> Result<Element, JsValue> {
    let class = format!("badge badge-{}", label.to_lowercase().replace(' ', "-"));
    Ok(ElementBuilder::new("span")?.class(&class).text(label).build())
}
