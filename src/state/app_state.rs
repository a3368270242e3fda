// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================
// Agrupa los stores (cada uno con un único escritor) y el estado de UI.
// No hay estado de autenticación fuera de TokenStore / AdminSessionStore.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::Ticket;
use crate::router::Route;
use crate::state::admin_session::AdminSessionStore;
use crate::state::admin_tickets::AdminTicketsStore;
use crate::state::derived::{FilteredTicketsMemo, TicketFilter};
use crate::state::reactivity::Subscribers;
use crate::state::ticket_store::TicketStore;
use crate::state::token_store::TokenStore;
use crate::utils::CancelToken;

/// Página de detalle pública (lectura directa, no pasa por el reducer)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketPage {
    pub ticket: Option<Ticket>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenStore,
    pub admin_session: AdminSessionStore,
    pub tickets: TicketStore,
    pub admin_tickets: AdminTicketsStore,

    // UI State
    pub route: Rc<RefCell<Route>>,
    pub filter: Rc<RefCell<TicketFilter>>,
    pub filtered_memo: Rc<FilteredTicketsMemo>,
    pub ticket_page: Rc<RefCell<TicketPage>>,
    /// Aviso de la última acción fallida (formularios)
    pub notice: Rc<RefCell<Option<String>>>,
    pub submitting: Rc<RefCell<bool>>,

    /// Token de cancelación de la ruta montada
    mount: Rc<RefCell<CancelToken>>,
    ui_subscribers: Subscribers,
}

impl AppState {
    pub fn new(tokens: TokenStore, admin_session: AdminSessionStore) -> Self {
        Self {
            tokens,
            admin_session,
            tickets: TicketStore::new(),
            admin_tickets: AdminTicketsStore::new(),
            route: Rc::new(RefCell::new(Route::Dashboard)),
            filter: Rc::new(RefCell::new(TicketFilter::default())),
            filtered_memo: Rc::new(FilteredTicketsMemo::new()),
            ticket_page: Rc::new(RefCell::new(TicketPage::default())),
            notice: Rc::new(RefCell::new(None)),
            submitting: Rc::new(RefCell::new(false)),
            mount: Rc::new(RefCell::new(CancelToken::new())),
            ui_subscribers: Subscribers::new(),
        }
    }

    /// Suscribirse a cambios de cualquier store o del estado de UI
    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        let callback: Rc<dyn Fn()> = Rc::new(callback);
        let cb = callback.clone();
        self.tokens.subscribe(move || cb());
        let cb = callback.clone();
        self.admin_session.subscribe(move || cb());
        let cb = callback.clone();
        self.tickets.subscribe(move || cb());
        let cb = callback.clone();
        self.admin_tickets.subscribe(move || cb());
        self.ui_subscribers.subscribe(move || callback());
    }

    pub fn notify_subscribers(&self) {
        self.ui_subscribers.notify();
    }

    pub fn current_route(&self) -> Route {
        self.route.borrow().clone()
    }

    /// Cambiar de ruta: cancela todo lo que lanzó la vista anterior.
    /// Devuelve el token de la nueva ruta.
    pub fn set_route(&self, route: Route) -> CancelToken {
        let fresh = CancelToken::new();
        let previous = self.mount.replace(fresh.clone());
        previous.cancel();

        *self.route.borrow_mut() = route;
        *self.notice.borrow_mut() = None;
        fresh
    }

    pub fn mount_token(&self) -> CancelToken {
        self.mount.borrow().clone()
    }

    pub fn set_filter(&self, filter: TicketFilter) {
        *self.filter.borrow_mut() = filter;
        self.notify_subscribers();
    }

    pub fn filter(&self) -> TicketFilter {
        self.filter.borrow().clone()
    }

    /// Tickets del store filtrados (memo por estado + filtro)
    pub fn filtered_tickets(&self) -> Rc<Vec<Rc<Ticket>>> {
        self.filtered_memo.get(&self.tickets.state(), &self.filter.borrow())
    }

    pub fn set_notice(&self, notice: Option<String>) {
        *self.notice.borrow_mut() = notice;
        self.notify_subscribers();
    }

    pub fn notice(&self) -> Option<String> {
        self.notice.borrow().clone()
    }

    pub fn set_submitting(&self, submitting: bool) {
        *self.submitting.borrow_mut() = submitting;
        self.notify_subscribers();
    }

    pub fn is_submitting(&self) -> bool {
        *self.submitting.borrow()
    }

    pub fn set_ticket_page(&self, page: TicketPage) {
        *self.ticket_page.borrow_mut() = page;
        self.notify_subscribers();
    }

    pub fn ticket_page(&self) -> TicketPage {
        self.ticket_page.borrow().clone()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::rc::Rc;

    use super::AppState;
    use crate::state::token_store::testing::ScriptedProvider;
    use crate::state::{AdminSessionStore, LocalCredentialIssuer, TokenStore};
    use crate::utils::MemoryStorage;

    pub fn app_state(provider: ScriptedProvider) -> AppState {
        let tokens = TokenStore::new(Rc::new(provider), 30);
        let admin = AdminSessionStore::new(
            Rc::new(MemoryStorage::new()),
            Rc::new(LocalCredentialIssuer { token: "dummy_token".into() }),
        );
        AppState::new(tokens, admin)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::testing::app_state;
    use super::*;
    use crate::state::token_store::testing::ScriptedProvider;

    #[test]
    fn route_change_cancels_previous_mount() {
        let state = app_state(ScriptedProvider::signed_out());
        let first = state.set_route(Route::Tickets);
        let second = state.set_route(Route::Dashboard);

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(!state.mount_token().is_cancelled());
        assert_eq!(state.current_route(), Route::Dashboard);
    }

    #[test]
    fn store_changes_reach_app_subscribers() {
        let state = app_state(ScriptedProvider::signed_out());
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        state.subscribe_to_changes(move || counter.set(counter.get() + 1));

        state.tickets.dispatch(crate::state::TicketAction::SetTickets(Vec::new()));
        state.set_notice(Some("oops".into()));

        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn unrelated_updates_keep_filtered_list_identity() {
        let state = app_state(ScriptedProvider::signed_out());
        let first = state.filtered_tickets();
        state.set_notice(None);
        assert!(Rc::ptr_eq(&first, &state.filtered_tickets()));
    }
}
