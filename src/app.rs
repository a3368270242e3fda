// ============================================================================
// APP - Aplicación principal
// ============================================================================
// - Construye los stores (dos sesiones independientes) y los viewmodels
// - Evalúa el guard del dominio en cada render
// - Carga los datos de la ruta una vez por montaje (con su CancelToken)
// - Programa la renovación del token con gloo-timers
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::Utc;
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::{append_child, clear_children, get_element_by_id};
use crate::router::{
    current_search, query_param, redirect, return_target, Domain, GuardOutcome, Route, RouteGuard,
};
use crate::services::{AdminApi, AdminListScope, IdentityProvider, KeycloakProvider, PublicApi, UnavailableProvider};
use crate::state::{AdminSessionStore, AppState, LocalCredentialIssuer, TicketPage, TokenStore};
use crate::utils::{BrowserStorage, APP_ROOT_ID};
use crate::viewmodels::{AdminViewModel, AuthTransitionTracker, TicketViewModel};
use crate::views::{render_pending, render_route};

/// Todo lo que necesita una vista: estado + viewmodels (clones baratos, Rc)
#[derive(Clone)]
pub struct AppContext {
    pub state: AppState,
    pub tickets: TicketViewModel,
    pub admin: AdminViewModel,
}

/// Aplicación principal
pub struct App {
    ctx: AppContext,
    root: Element,
    auth_tracker: Rc<AuthTransitionTracker>,
    expiry_timer: Rc<RefCell<Option<Timeout>>>,
    /// La ruta montada ya lanzó su carga
    route_loaded: Cell<bool>,
}

fn identity_provider() -> Rc<dyn IdentityProvider> {
    match KeycloakProvider::new(&CONFIG.keycloak) {
        Ok(provider) => Rc::new(provider),
        Err(e) => {
            log::warn!("⚠️ [APP] Keycloak no disponible, login público desactivado: {}", e);
            Rc::new(UnavailableProvider { reason: e.to_string() })
        }
    }
}

impl App {
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id(APP_ROOT_ID)
            .ok_or_else(|| JsValue::from_str("No #app element found"))?;

        let tokens = TokenStore::new(identity_provider(), CONFIG.token_min_validity_seconds);
        let admin_session = AdminSessionStore::new(
            Rc::new(BrowserStorage),
            Rc::new(LocalCredentialIssuer { token: CONFIG.admin_dev_token.clone() }),
        );
        let state = AppState::new(tokens.clone(), admin_session.clone());

        let public_api = PublicApi::new(CONFIG.api_url.as_str(), tokens);
        let admin_api = AdminApi::new(CONFIG.admin_api_url.as_str(), admin_session);
        let ctx = AppContext {
            tickets: TicketViewModel::new(public_api, state.tickets.clone()),
            admin: AdminViewModel::new(admin_api, state.admin_tickets.clone()),
            state,
        };
        ctx.state.set_route(crate::router::current_route());

        log::info!("🚀 [APP] API {} · admin {}", CONFIG.api_url, CONFIG.admin_api_url);
        Ok(Self {
            ctx,
            root,
            auth_tracker: Rc::new(AuthTransitionTracker::new()),
            expiry_timer: Rc::new(RefCell::new(None)),
            route_loaded: Cell::new(false),
        })
    }

    /// Suscripciones + check silencioso de sesión
    pub fn start(&self) {
        self.ctx.state.subscribe_to_changes(crate::schedule_rerender);

        let ctx = self.ctx.clone();
        let tracker = self.auth_tracker.clone();
        let timer = self.expiry_timer.clone();
        self.ctx.state.tokens.subscribe(move || {
            let tokens = &ctx.state.tokens;
            if let Some(transition) = tracker.observe(tokens.authenticated()) {
                log::info!("🔁 [APP] Transición de sesión: {:?}", transition);
                let tickets = ctx.tickets.clone();
                spawn_local(async move { tickets.on_auth_transition(transition).await });
            }
            schedule_expiry(tokens, &timer);
        });

        let tokens = self.ctx.state.tokens.clone();
        spawn_local(async move { tokens.init().await });
    }

    /// Cambio de ruta (pushState / popstate)
    pub fn navigate_to(&self, route: Route) {
        if route == self.ctx.state.current_route() {
            return;
        }
        log::debug!("🧭 [APP] Montando {}", route.path());
        self.ctx.state.set_route(route);
        self.route_loaded.set(false);
    }

    pub fn render(&self) -> Result<(), JsValue> {
        let route = self.ctx.state.current_route();
        let view = match self.guard(&route) {
            GuardOutcome::Pending => render_pending()?,
            GuardOutcome::Redirect { to, return_to } => {
                let target = match (&to, return_to) {
                    (Route::Login, Some(back)) => {
                        let encoded = String::from(js_sys::encode_uri_component(&back));
                        format!("{}?return_to={}", to.path(), encoded)
                    }
                    _ => to.path(),
                };
                redirect(&target);
                return Ok(());
            }
            GuardOutcome::Render => {
                if let Some(target) = self.already_signed_in(&route) {
                    redirect(&target);
                    return Ok(());
                }
                self.load_route_data(&route);
                render_route(&self.ctx, &route, self.return_target())?
            }
        };

        clear_children(&self.root);
        append_child(&self.root, &view)
    }

    fn guard(&self, route: &Route) -> GuardOutcome {
        if !route.is_protected() {
            return GuardOutcome::Render;
        }
        match route.domain() {
            Some(Domain::Public) => RouteGuard::public(self.ctx.state.tokens.clone()).evaluate(route),
            Some(Domain::Admin) => RouteGuard::admin(self.ctx.state.admin_session.clone()).evaluate(route),
            None => GuardOutcome::Render,
        }
    }

    /// En /login o /admin/login con sesión activa: seguir adelante
    fn already_signed_in(&self, route: &Route) -> Option<String> {
        match route {
            Route::Login if self.ctx.state.tokens.authenticated() => Some(self.return_target().path()),
            Route::AdminLogin if self.ctx.state.admin_session.authenticated() => {
                Some(Route::AdminTickets.path())
            }
            _ => None,
        }
    }

    /// ?return_to= de la URL actual, ya saneado
    fn return_target(&self) -> Route {
        return_target(query_param(&current_search(), "return_to").as_deref())
    }

    /// Carga de datos de la ruta, una vez por montaje
    fn load_route_data(&self, route: &Route) {
        if self.route_loaded.replace(true) {
            return;
        }
        let cancel = self.ctx.state.mount_token();

        match route {
            Route::TicketDetail(id) => {
                self.ctx.state.set_ticket_page(TicketPage { loading: true, ..TicketPage::default() });
                let ctx = self.ctx.clone();
                let id = id.clone();
                spawn_local(async move {
                    let page = match ctx.tickets.get_ticket(&id, Some(&cancel)).await {
                        Ok(ticket) => TicketPage { ticket: Some(ticket), ..TicketPage::default() },
                        Err(e) if e.is_cancelled() => return,
                        Err(e) => {
                            log::error!("❌ [APP] Ticket {}: {}", id, e);
                            TicketPage { error: Some(e.to_string()), ..TicketPage::default() }
                        }
                    };
                    ctx.state.set_ticket_page(page);
                });
            }
            Route::AdminTickets | Route::AdminUnclaimed | Route::AdminMyClaims => {
                let scope = match route {
                    Route::AdminUnclaimed => AdminListScope::Unclaimed,
                    Route::AdminMyClaims => AdminListScope::Mine,
                    _ => AdminListScope::All,
                };
                let admin = self.ctx.admin.clone();
                spawn_local(async move { admin.load_tickets(scope, Some(&cancel)).await });
            }
            Route::AdminTicketDetail(id) => {
                let admin = self.ctx.admin.clone();
                let id = *id;
                spawn_local(async move { admin.load_ticket(id, Some(&cancel)).await });
            }
            _ => {}
        }
    }
}

/// Suelo para no encadenar renovaciones si el reloj local va desfasado
const MIN_RENEW_DELAY_MS: u64 = 1_000;

/// Renovación programada: expires_at - min_validity. Soltar el Timeout
/// anterior lo cancela.
fn schedule_expiry(tokens: &TokenStore, timer: &Rc<RefCell<Option<Timeout>>>) {
    let next = tokens.refresh_delay_ms(Utc::now()).map(|delay| {
        let tokens = tokens.clone();
        let millis = u32::try_from(delay.max(MIN_RENEW_DELAY_MS)).unwrap_or(u32::MAX);
        log::debug!("⏱️ [APP] Renovación de token en {} ms", millis);
        Timeout::new(millis, move || {
            spawn_local(async move { tokens.handle_expiry().await });
        })
    });
    *timer.borrow_mut() = next;
}
