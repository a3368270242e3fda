// ============================================================================
// TICKET VIEWMODEL - LÓGICA DE TICKETS DEL USUARIO
// ============================================================================
// Único escritor del TicketStore:
// - lecturas fallidas: log + se conserva el último estado bueno
// - mutaciones fallidas: el error vuelve a quien las lanzó
// ============================================================================

use std::cell::Cell;

use crate::error::ApiError;
use crate::models::{Comment, NewComment, NewTicket, Ticket};
use crate::services::PublicApi;
use crate::state::{TicketAction, TicketStore};
use crate::utils::CancelToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTransition {
    SignedIn,
    SignedOut,
}

/// Detecta flancos del flag authenticated (false→true / true→false)
#[derive(Debug, Default)]
pub struct AuthTransitionTracker {
    last: Cell<bool>,
}

impl AuthTransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&self, authenticated: bool) -> Option<AuthTransition> {
        let previous = self.last.replace(authenticated);
        match (previous, authenticated) {
            (false, true) => Some(AuthTransition::SignedIn),
            (true, false) => Some(AuthTransition::SignedOut),
            _ => None,
        }
    }
}

fn was_cancelled(cancel: Option<&CancelToken>) -> bool {
    cancel.map(CancelToken::is_cancelled).unwrap_or(false)
}

#[derive(Clone)]
pub struct TicketViewModel {
    api: PublicApi,
    store: TicketStore,
}

impl TicketViewModel {
    pub fn new(api: PublicApi, store: TicketStore) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &TicketStore {
        &self.store
    }

    /// Carga la lista completa. Nunca devuelve error.
    pub async fn fetch_tickets(&self, cancel: Option<&CancelToken>) {
        self.store.begin_loading();

        match self.api.list_tickets(cancel).await {
            Ok(_) if was_cancelled(cancel) => {
                log::debug!("🛑 [TICKETS] Respuesta descartada (vista desmontada)");
            }
            Ok(tickets) => {
                log::info!("✅ [TICKETS] {} tickets cargados", tickets.len());
                self.store.dispatch(TicketAction::SetTickets(tickets));
            }
            Err(ApiError::Cancelled) => log::debug!("🛑 [TICKETS] Carga cancelada"),
            Err(e) => log::error!("❌ [TICKETS] Error cargando tickets: {}", e),
        }
        self.store.finish_loading();
    }

    pub async fn create_ticket(&self, title: &str, description: &str) -> Result<Ticket, ApiError> {
        let body = NewTicket {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
        };
        let ticket = self.api.create_ticket(&body).await?;
        log::info!("✅ [TICKETS] Ticket {} creado", ticket.id);
        self.store.dispatch(TicketAction::AddTicket(ticket.clone()));
        Ok(ticket)
    }

    pub async fn add_comment(&self, ticket_id: &str, text: &str) -> Result<Comment, ApiError> {
        let body = NewComment { text: text.trim().to_string() };
        let comment = self.api.add_comment(ticket_id, &body).await?;
        self.store.dispatch(TicketAction::AddComment(comment.clone()));
        Ok(comment)
    }

    /// Lectura directa para la página de detalle (no toca el store)
    pub async fn get_ticket(&self, id: &str, cancel: Option<&CancelToken>) -> Result<Ticket, ApiError> {
        let ticket = self.api.get_ticket(id, cancel).await?;
        if was_cancelled(cancel) {
            return Err(ApiError::Cancelled);
        }
        Ok(ticket)
    }

    /// SignedIn → exactamente un fetch; SignedOut → Reset
    pub async fn on_auth_transition(&self, transition: AuthTransition) {
        match transition {
            AuthTransition::SignedIn => self.fetch_tickets(None).await,
            AuthTransition::SignedOut => self.store.dispatch(TicketAction::Reset),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use futures::executor::block_on;

    use super::*;
    use crate::services::adapter::testing::RecordingTransport;
    use crate::services::{AdminApi, HttpAdapter, Method};
    use crate::state::token_store::testing::ScriptedProvider;
    use crate::state::{AdminSessionStore, LocalCredentialIssuer, StorePhase, TokenStore};
    use crate::utils::{MemoryStorage, STORAGE_KEY_ADMIN_TOKEN};

    const TICKETS_JSON: &str = r#"[
        {"id":"1","title":"VPN","description":"d","status":"open","created_at":"2024-03-01T09:00:00Z","comments":[]},
        {"id":"2","title":"Mail","description":"d","status":"In Progress","created_at":"2024-03-01T10:00:00Z"}
    ]"#;

    fn signed_in_tokens() -> TokenStore {
        let tokens = TokenStore::new(Rc::new(ScriptedProvider::signed_in("kc-token")), 30);
        block_on(tokens.init());
        tokens
    }

    fn viewmodel() -> (TicketViewModel, Rc<RecordingTransport>) {
        let transport = RecordingTransport::new();
        let api = HttpAdapter::with_transport("http://api", signed_in_tokens(), transport.clone());
        (TicketViewModel::new(api, TicketStore::new()), transport)
    }

    #[test]
    fn tracker_reports_only_edges() {
        let tracker = AuthTransitionTracker::new();
        assert_eq!(tracker.observe(false), None);
        assert_eq!(tracker.observe(true), Some(AuthTransition::SignedIn));
        assert_eq!(tracker.observe(true), None);
        assert_eq!(tracker.observe(false), Some(AuthTransition::SignedOut));
        assert_eq!(tracker.observe(false), None);
    }

    #[test]
    fn sign_in_fetches_exactly_once() {
        let (vm, transport) = viewmodel();
        transport.respond(200, TICKETS_JSON);
        let tracker = AuthTransitionTracker::new();

        for authenticated in [false, true, true, true] {
            if let Some(transition) = tracker.observe(authenticated) {
                block_on(vm.on_auth_transition(transition));
            }
        }

        assert_eq!(transport.request_count(), 1);
        let sent = transport.last_request();
        assert_eq!(sent.url, "http://api/tickets");
        assert_eq!(sent.bearer_token(), Some("kc-token"));
        assert_eq!(vm.store().state().len(), 2);
        assert_eq!(vm.store().phase(), StorePhase::Ready);
    }

    #[test]
    fn sign_out_resets_store() {
        let (vm, transport) = viewmodel();
        transport.respond(200, TICKETS_JSON);
        block_on(vm.on_auth_transition(AuthTransition::SignedIn));

        block_on(vm.on_auth_transition(AuthTransition::SignedOut));

        assert!(vm.store().state().is_empty());
        assert_eq!(vm.store().phase(), StorePhase::Uninitialized);
    }

    #[test]
    fn created_ticket_goes_first() {
        let (vm, transport) = viewmodel();
        transport.respond(200, TICKETS_JSON);
        block_on(vm.fetch_tickets(None));
        transport.respond(
            201,
            r#"{"id":"3","title":"Printer down","description":"3rd floor","status":"open","created_at":"2024-03-02T08:00:00Z"}"#,
        );

        let created = block_on(vm.create_ticket("Printer down", " 3rd floor ")).unwrap();

        assert_eq!(created.title, "Printer down");
        assert_eq!(vm.store().state().tickets[0].title, "Printer down");
        let sent = transport.last_request();
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.body.as_deref(), Some(r#"{"title":"Printer down","description":"3rd floor"}"#));
    }

    #[test]
    fn failed_fetch_leaves_state_untouched() {
        let (vm, transport) = viewmodel();
        transport.respond(200, TICKETS_JSON);
        block_on(vm.fetch_tickets(None));
        let before = vm.store().state();
        let phase_before = vm.store().phase();

        transport.fail(ApiError::Network("offline".into()));
        block_on(vm.fetch_tickets(None));

        assert!(Rc::ptr_eq(&before, &vm.store().state()));
        assert_eq!(vm.store().phase(), phase_before);
    }

    #[test]
    fn failed_first_fetch_returns_to_uninitialized() {
        let (vm, transport) = viewmodel();
        transport.respond(500, "boom");
        block_on(vm.fetch_tickets(None));
        assert_eq!(vm.store().phase(), StorePhase::Uninitialized);
    }

    #[test]
    fn failed_mutation_is_returned_and_not_dispatched() {
        let (vm, transport) = viewmodel();
        transport.respond(422, "title required");

        let err = block_on(vm.create_ticket("", "")).unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert!(vm.store().state().is_empty());
    }

    #[test]
    fn comment_is_appended_to_its_ticket() {
        let (vm, transport) = viewmodel();
        transport.respond(200, TICKETS_JSON);
        block_on(vm.fetch_tickets(None));
        transport.respond(
            201,
            r#"{"id":"c1","ticket_id":"2","author":"me","text":"any news?","created_at":"2024-03-02T08:00:00Z"}"#,
        );

        block_on(vm.add_comment("2", "any news?")).unwrap();

        assert_eq!(transport.last_request().url, "http://api/tickets/2/comments");
        let state = vm.store().state();
        assert_eq!(state.find("2").map(|t| t.comments.len()), Some(1));
    }

    #[test]
    fn cancelled_fetch_is_dropped() {
        let (vm, transport) = viewmodel();
        let cancel = CancelToken::new();
        cancel.cancel();

        block_on(vm.fetch_tickets(Some(&cancel)));

        assert_eq!(transport.request_count(), 1);
        assert_eq!(vm.store().phase(), StorePhase::Uninitialized);
    }

    #[test]
    fn adapters_never_share_tokens() {
        let transport = RecordingTransport::new();
        let public: PublicApi =
            HttpAdapter::with_transport("http://api", signed_in_tokens(), transport.clone());
        let admin_session = AdminSessionStore::new(
            Rc::new(MemoryStorage::with_entry(STORAGE_KEY_ADMIN_TOKEN, "dummy_token")),
            Rc::new(LocalCredentialIssuer { token: "dummy_token".into() }),
        );
        let admin: AdminApi =
            HttpAdapter::with_transport("http://api/admin", admin_session, transport.clone());

        transport.respond(200, "[]");
        block_on(public.list_tickets(None)).unwrap();
        assert_eq!(transport.last_request().bearer_token(), Some("kc-token"));

        transport.respond(200, "[]");
        block_on(admin.list_tickets(Default::default(), None)).unwrap();
        assert_eq!(transport.last_request().bearer_token(), Some("dummy_token"));
        assert_eq!(transport.last_request().url, "http://api/admin/tickets");
    }

    fn admin_session(storage: MemoryStorage) -> AdminSessionStore {
        AdminSessionStore::new(
            Rc::new(storage),
            Rc::new(LocalCredentialIssuer { token: "dummy_token".into() }),
        )
    }

    #[test]
    fn admin_requests_never_borrow_the_public_token() {
        let transport = RecordingTransport::new();
        let tokens = signed_in_tokens();
        let admin: AdminApi =
            HttpAdapter::with_transport("http://api/admin", admin_session(MemoryStorage::new()), transport.clone());

        transport.respond(401, "missing token");
        let err = block_on(admin.list_tickets(Default::default(), None)).unwrap_err();

        assert!(tokens.authenticated());
        assert!(err.is_unauthorized());
        assert_eq!(transport.last_request().bearer_token(), None);
    }

    #[test]
    fn public_requests_never_borrow_the_admin_token() {
        let transport = RecordingTransport::new();
        let tokens = TokenStore::new(Rc::new(ScriptedProvider::signed_out()), 30);
        block_on(tokens.init());
        let session = admin_session(MemoryStorage::with_entry(STORAGE_KEY_ADMIN_TOKEN, "dummy_token"));
        let public: PublicApi = HttpAdapter::with_transport("http://api", tokens, transport.clone());

        transport.respond(200, "[]");
        block_on(public.list_tickets(None)).unwrap();

        assert!(session.authenticated());
        assert_eq!(transport.last_request().bearer_token(), None);
        assert_eq!(transport.last_request().header_value("Authorization"), None);
    }
}
