// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod reactivity;
pub mod token_store;
pub mod admin_session;
pub mod ticket_store;
pub mod admin_tickets;
pub mod derived;
pub mod app_state;

pub use token_store::TokenStore;
pub use admin_session::{AdminSessionStore, LocalCredentialIssuer};
pub use ticket_store::{StorePhase, TicketAction, TicketStore};
pub use admin_tickets::AdminTicketsStore;
pub use derived::{comment_thread, recent_tickets, status_counts, StatusCounts, StatusFilter, TicketFilter};
pub use app_state::{AppState, TicketPage};
