// ============================================================================
// DERIVED VIEWS - Proyecciones puras del Ticket Store
// ============================================================================
// No modifican nada. FilteredTicketsMemo evita recalcular en re-renders
// que no cambian ni el estado ni el filtro.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::{Comment, Ticket, TicketStatus};
use crate::state::ticket_store::TicketState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TicketStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: TicketStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => *expected == status,
        }
    }

    /// Valor del <select> ("" = todos)
    pub fn from_value(value: &str) -> Self {
        TicketStatus::from_label(value).map_or(StatusFilter::All, StatusFilter::Only)
    }

    pub fn value(&self) -> &'static str {
        match self {
            StatusFilter::All => "",
            StatusFilter::Only(status) => status.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketFilter {
    pub search: String,
    pub status: StatusFilter,
}

impl TicketFilter {
    pub fn matches(&self, ticket: &Ticket) -> bool {
        let needle = self.search.trim().to_lowercase();
        let title_ok = needle.is_empty() || ticket.title.to_lowercase().contains(&needle);
        title_ok && self.status.matches(ticket.status)
    }
}

pub fn filter_tickets(tickets: &[Rc<Ticket>], filter: &TicketFilter) -> Vec<Rc<Ticket>> {
    tickets
        .iter()
        .filter(|ticket| filter.matches(ticket))
        .cloned()
        .collect()
}

/// Más recientes primero (orden estable para empates)
pub fn recent_tickets(tickets: &[Rc<Ticket>], limit: usize) -> Vec<Rc<Ticket>> {
    let mut sorted: Vec<Rc<Ticket>> = tickets.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

/// Comentarios del ticket en orden de llegada (vacío si no está en caché)
pub fn comment_thread(state: &TicketState, ticket_id: &str) -> Vec<Comment> {
    state
        .find(ticket_id)
        .map(|ticket| ticket.comments.clone())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub open: usize,
    pub in_progress: usize,
    pub closed: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.open + self.in_progress + self.closed
    }
}

pub fn status_counts(tickets: &[Rc<Ticket>]) -> StatusCounts {
    tickets.iter().fold(StatusCounts::default(), |mut counts, ticket| {
        match ticket.status {
            TicketStatus::Open => counts.open += 1,
            TicketStatus::InProgress => counts.in_progress += 1,
            TicketStatus::Closed => counts.closed += 1,
        }
        counts
    })
}

type MemoEntry = (Rc<TicketState>, TicketFilter, Rc<Vec<Rc<Ticket>>>);

/// Memo por [referencia de estado, filtro]
#[derive(Default)]
pub struct FilteredTicketsMemo {
    entry: RefCell<Option<MemoEntry>>,
}

impl FilteredTicketsMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, state: &Rc<TicketState>, filter: &TicketFilter) -> Rc<Vec<Rc<Ticket>>> {
        if let Some((cached_state, cached_filter, result)) = self.entry.borrow().as_ref() {
            if Rc::ptr_eq(cached_state, state) && cached_filter == filter {
                return Rc::clone(result);
            }
        }

        let result = Rc::new(filter_tickets(&state.tickets, filter));
        *self.entry.borrow_mut() = Some((Rc::clone(state), filter.clone(), Rc::clone(&result)));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ticket_store::fixtures::{comment, ticket};
    use crate::state::ticket_store::{reduce, TicketAction};

    fn state() -> Rc<TicketState> {
        let mut vpn = ticket("1", "VPN not connecting", 0);
        vpn.status = TicketStatus::InProgress;
        let printer = ticket("2", "Printer down", 10);
        let mut mail = ticket("3", "Mail quota", 5);
        mail.status = TicketStatus::Closed;
        reduce(
            &Rc::new(TicketState::default()),
            TicketAction::SetTickets(vec![vpn, printer, mail]),
        )
    }

    #[test]
    fn filter_is_case_insensitive_and_combines_status() {
        let state = state();
        let filter = TicketFilter { search: "vpn".into(), status: StatusFilter::All };
        assert_eq!(filter_tickets(&state.tickets, &filter).len(), 1);

        let filter = TicketFilter {
            search: "VPN".into(),
            status: StatusFilter::Only(TicketStatus::Open),
        };
        assert!(filter_tickets(&state.tickets, &filter).is_empty());
    }

    #[test]
    fn recent_orders_newest_first_and_limits() {
        let state = state();
        let recent = recent_tickets(&state.tickets, 2);
        let ids: Vec<&str> = recent.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn thread_of_unknown_ticket_is_empty() {
        let state = reduce(&state(), TicketAction::AddComment(comment("c", "1", "first")));
        assert_eq!(comment_thread(&state, "1").len(), 1);
        assert!(comment_thread(&state, "nope").is_empty());
    }

    #[test]
    fn counts_by_status() {
        let counts = status_counts(&state().tickets);
        assert_eq!(counts, StatusCounts { open: 1, in_progress: 1, closed: 1 });
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn status_filter_round_trips_select_value() {
        assert_eq!(StatusFilter::from_value(""), StatusFilter::All);
        let only = StatusFilter::from_value("In Progress");
        assert_eq!(only, StatusFilter::Only(TicketStatus::InProgress));
        assert_eq!(only.value(), "In Progress");
    }

    #[test]
    fn memo_reuses_result_until_inputs_change() {
        let memo = FilteredTicketsMemo::new();
        let state = state();
        let filter = TicketFilter::default();

        let first = memo.get(&state, &filter);
        let second = memo.get(&state, &filter);
        assert!(Rc::ptr_eq(&first, &second));

        let narrowed = TicketFilter { search: "mail".into(), ..TicketFilter::default() };
        let third = memo.get(&state, &narrowed);
        assert!(!Rc::ptr_eq(&second, &third));
        assert_eq!(third.len(), 1);

        let changed = reduce(&state, TicketAction::AddComment(comment("c", "3", "x")));
        let fourth = memo.get(&changed, &narrowed);
        assert!(!Rc::ptr_eq(&third, &fourth));
    }
}
