// ============================================================================
// ADMIN TICKETS - Caché de la superficie admin (separada del Ticket Store)
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::{AdminComment, AdminTicket, AdminTicketDetail, Suggestion, VectorSuggestions};
use crate::services::AdminListScope;
use crate::state::reactivity::Subscribers;

/// Lista admin: error local, sin fase global
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminTicketList {
    pub tickets: Vec<Rc<AdminTicket>>,
    pub scope: AdminListScope,
    pub loading: bool,
    pub error: Option<String>,
}

/// Sustituye solo la entrada con el mismo id; el resto conserva su Rc
pub fn replace_by_id(tickets: &[Rc<AdminTicket>], updated: AdminTicket) -> Vec<Rc<AdminTicket>> {
    let updated = Rc::new(updated);
    tickets
        .iter()
        .map(|ticket| {
            if ticket.id == updated.id {
                Rc::clone(&updated)
            } else {
                Rc::clone(ticket)
            }
        })
        .collect()
}

/// Página de detalle admin
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminTicketPage {
    pub ticket: Option<AdminTicketDetail>,
    pub loading: bool,
    pub error: Option<String>,
    pub suggestions: VectorSuggestions,
    pub suggestions_loading: bool,
    pub search_query: String,
    pub search_results: Vec<Suggestion>,
    /// Aviso de la última mutación fallida (status/comentario)
    pub notice: Option<String>,
}

#[derive(Clone, Default)]
pub struct AdminTicketsStore {
    list: Rc<RefCell<AdminTicketList>>,
    page: Rc<RefCell<AdminTicketPage>>,
    subscribers: Subscribers,
}

impl AdminTicketsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.subscribe(callback);
    }

    pub fn list(&self) -> AdminTicketList {
        self.list.borrow().clone()
    }

    pub fn page(&self) -> AdminTicketPage {
        self.page.borrow().clone()
    }

    // ========================================================================
    // LISTA
    // ========================================================================

    pub fn begin_list(&self, scope: AdminListScope) {
        {
            let mut list = self.list.borrow_mut();
            list.scope = scope;
            list.loading = true;
            list.error = None;
        }
        self.subscribers.notify();
    }

    pub fn set_list(&self, tickets: Vec<AdminTicket>) {
        {
            let mut list = self.list.borrow_mut();
            list.tickets = tickets.into_iter().map(Rc::new).collect();
            list.loading = false;
        }
        self.subscribers.notify();
    }

    pub fn fail_list(&self, message: String) {
        {
            let mut list = self.list.borrow_mut();
            list.loading = false;
            list.error = Some(message);
        }
        self.subscribers.notify();
    }

    /// Respuesta de claim/status: lista y detalle (si es el mismo ticket)
    pub fn apply_update(&self, updated: AdminTicket) {
        {
            let mut page = self.page.borrow_mut();
            if let Some(detail) = page.ticket.as_mut().filter(|d| d.id == updated.id) {
                detail.apply_update(&updated);
            }
        }
        {
            let mut list = self.list.borrow_mut();
            list.tickets = replace_by_id(&list.tickets, updated);
        }
        self.subscribers.notify();
    }

    // ========================================================================
    // DETALLE
    // ========================================================================

    pub fn begin_page(&self) {
        *self.page.borrow_mut() = AdminTicketPage {
            loading: true,
            ..AdminTicketPage::default()
        };
        self.subscribers.notify();
    }

    pub fn set_detail(&self, detail: AdminTicketDetail) {
        {
            let mut page = self.page.borrow_mut();
            page.ticket = Some(detail);
            page.loading = false;
        }
        self.subscribers.notify();
    }

    pub fn fail_page(&self, message: String) {
        {
            let mut page = self.page.borrow_mut();
            page.loading = false;
            page.error = Some(message);
        }
        self.subscribers.notify();
    }

    pub fn set_suggestions_loading(&self, loading: bool) {
        self.page.borrow_mut().suggestions_loading = loading;
        self.subscribers.notify();
    }

    pub fn set_suggestions(&self, suggestions: VectorSuggestions) {
        {
            let mut page = self.page.borrow_mut();
            page.suggestions = suggestions;
            page.suggestions_loading = false;
        }
        self.subscribers.notify();
    }

    pub fn push_comment(&self, comment: AdminComment) {
        {
            let mut page = self.page.borrow_mut();
            page.notice = None;
            match page.ticket.as_mut() {
                Some(detail) if detail.id == comment.ticket_id => detail.comments.push(comment),
                _ => log::debug!("🔍 [ADMIN] Comentario para ticket no cargado {}", comment.ticket_id),
            }
        }
        self.subscribers.notify();
    }

    pub fn set_search(&self, query: &str, results: Vec<Suggestion>) {
        {
            let mut page = self.page.borrow_mut();
            page.search_query = query.to_string();
            page.search_results = results;
        }
        self.subscribers.notify();
    }

    pub fn set_notice(&self, notice: Option<String>) {
        self.page.borrow_mut().notice = notice;
        self.subscribers.notify();
    }

    /// Logout admin
    pub fn clear(&self) {
        *self.list.borrow_mut() = AdminTicketList::default();
        *self.page.borrow_mut() = AdminTicketPage::default();
        self.subscribers.notify();
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::models::{AdminTicket, AdminTicketStatus};

    pub fn admin_ticket(id: i64, title: &str) -> AdminTicket {
        AdminTicket {
            id,
            title: title.to_string(),
            description: String::new(),
            status: AdminTicketStatus::Open,
            user_id: 7,
            engineer_id: None,
            created_at: Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap(),
        }
    }
}
