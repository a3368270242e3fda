// ============================================================================
// LOGIN VIEWS - Login público (Keycloak) y login de soporte
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::app::AppContext;
use crate::dom::{field_value, on_submit, ElementBuilder};
use crate::router::{absolute_url, navigate, Route};
use crate::views::layout::{render_loading, render_notice};

/// Login público: el formulario real lo pone el proveedor de identidad.
/// `return_to` es la ruta que el guard interceptó (ya saneada).
pub fn render_login(ctx: &AppContext, return_to: Route) -> Result<Element, JsValue> {
    if !ctx.state.tokens.is_initialized() {
        return render_loading("Checking session…");
    }

    let tokens = ctx.state.tokens.clone();
    let target = return_to.path();
    let button = ElementBuilder::new("button")?
        .class("btn-primary")
        .text("Sign in")
        .on_click(move |_| {
            let tokens = tokens.clone();
            let redirect_uri = absolute_url(&target);
            spawn_local(async move {
                tokens.login(Some(&redirect_uri)).await;
            });
        })?
        .build();

    Ok(ElementBuilder::new("div")?
        .class("login-screen")
        .child(
            ElementBuilder::new("div")?
                .class("login-container")
                .child(ElementBuilder::new("h1")?.text("Helpdesk").build())?
                .child(ElementBuilder::new("p")?.text("Sign in to follow your tickets").build())?
                .child(button)?
                .build(),
        )?
        .build())
}

fn form_field(id: &str, label: &str, input_type: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("form-group")
        .child(ElementBuilder::new("label")?.attr("for", id)?.text(label).build())?
        .child(
            ElementBuilder::new("input")?
                .id(id)?
                .attr("type", input_type)?
                .attr("autocomplete", "off")?
                .build(),
        )?
        .build())
}

/// Login de soporte. Tras entrar siempre se va a /admin/tickets.
pub fn render_admin_login(ctx: &AppContext) -> Result<Element, JsValue> {
    let form = ElementBuilder::new("form")?
        .class("login-form")
        .child(form_field("admin-username", "Username", "text")?)?
        .child(form_field("admin-password", "Password", "password")?)?
        .child(
            ElementBuilder::new("button")?
                .class("btn-primary")
                .attr("type", "submit")?
                .text("Sign in")
                .build(),
        )?
        .build();

    let session = ctx.state.admin_session.clone();
    let state = ctx.state.clone();
    on_submit(&form, move || {
        let username = field_value("admin-username");
        let password = field_value("admin-password");
        let session = session.clone();
        let state = state.clone();
        spawn_local(async move {
            match session.login(&username, &password).await {
                Ok(()) => navigate(&Route::AdminTickets),
                Err(e) => state.set_notice(Some(e.to_string())),
            }
        });
    })?;

    let mut container = ElementBuilder::new("div")?
        .class("login-container")
        .child(ElementBuilder::new("h1")?.text("Support login").build())?;
    if let Some(notice) = ctx.state.notice() {
        container = container.child(render_notice(&notice)?)?;
    }

    Ok(ElementBuilder::new("div")?
        .class("login-screen")
        .child(container.child(form)?.build())?
        .build())
}
