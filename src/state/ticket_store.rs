// ============================================================================
// TICKET STORE - Caché de tickets del usuario (reducer)
// ============================================================================
// - reduce() es pura: (estado, acción) -> estado
// - Las acciones que no cambian nada devuelven la MISMA referencia (Rc)
// - Tickets en Rc: los que no cambian se comparten entre estados
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::models::{Comment, Ticket};
use crate::state::reactivity::Subscribers;

/// Estado inmutable del store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketState {
    pub tickets: Vec<Rc<Ticket>>,
}

impl TicketState {
    pub fn find(&self, ticket_id: &str) -> Option<&Rc<Ticket>> {
        self.tickets.iter().find(|t| t.id == ticket_id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TicketAction {
    /// Reemplazo completo, nunca merge
    SetTickets(Vec<Ticket>),
    /// Al principio. Sin de-duplicación.
    AddTicket(Ticket),
    /// Al final de los comentarios del ticket `comment.ticket_id`
    AddComment(Comment),
    /// Vaciar (logout público)
    Reset,
}

impl TicketAction {
    fn name(&self) -> &'static str {
        match self {
            TicketAction::SetTickets(_) => "SET_TICKETS",
            TicketAction::AddTicket(_) => "ADD_TICKET",
            TicketAction::AddComment(_) => "ADD_COMMENT",
            TicketAction::Reset => "RESET",
        }
    }
}

pub fn reduce(state: &Rc<TicketState>, action: TicketAction) -> Rc<TicketState> {
    match action {
        TicketAction::SetTickets(tickets) => Rc::new(TicketState {
            tickets: tickets.into_iter().map(Rc::new).collect(),
        }),
        TicketAction::AddTicket(ticket) => {
            let mut tickets = Vec::with_capacity(state.tickets.len() + 1);
            tickets.push(Rc::new(ticket));
            tickets.extend(state.tickets.iter().cloned());
            Rc::new(TicketState { tickets })
        }
        TicketAction::AddComment(comment) => {
            if state.find(&comment.ticket_id).is_none() {
                log::debug!("🔍 [TICKETS] Comentario para ticket desconocido {}", comment.ticket_id);
                return Rc::clone(state);
            }
            let tickets = state
                .tickets
                .iter()
                .map(|ticket| {
                    if ticket.id == comment.ticket_id {
                        let mut updated = Ticket::clone(ticket);
                        updated.comments.push(comment.clone());
                        Rc::new(updated)
                    } else {
                        Rc::clone(ticket)
                    }
                })
                .collect();
            Rc::new(TicketState { tickets })
        }
        TicketAction::Reset => {
            if state.is_empty() {
                Rc::clone(state)
            } else {
                Rc::new(TicketState::default())
            }
        }
    }
}

/// Fase de carga del store (no hay fase de error)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorePhase {
    #[default]
    Uninitialized,
    Loading,
    Ready,
}

/// Contenedor con un único escritor (TicketViewModel)
#[derive(Clone)]
pub struct TicketStore {
    state: Rc<RefCell<Rc<TicketState>>>,
    phase: Rc<Cell<StorePhase>>,
    /// Última fase fijada por un dispatch (a la que vuelve un fetch fallido)
    settled: Rc<Cell<StorePhase>>,
    /// Cargas en vuelo
    pending: Rc<Cell<u32>>,
    subscribers: Subscribers,
}

impl TicketStore {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(Rc::new(TicketState::default()))),
            phase: Rc::new(Cell::new(StorePhase::Uninitialized)),
            settled: Rc::new(Cell::new(StorePhase::Uninitialized)),
            pending: Rc::new(Cell::new(0)),
            subscribers: Subscribers::new(),
        }
    }

    pub fn state(&self) -> Rc<TicketState> {
        Rc::clone(&self.state.borrow())
    }

    pub fn phase(&self) -> StorePhase {
        self.phase.get()
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.subscribe(callback);
    }

    pub fn dispatch(&self, action: TicketAction) {
        log::debug!("📦 [TICKETS] {}", action.name());
        let next_phase = match action {
            TicketAction::Reset => StorePhase::Uninitialized,
            _ => StorePhase::Ready,
        };

        let current = self.state();
        let next = reduce(&current, action);
        let changed = !Rc::ptr_eq(&current, &next) || self.phase.get() != next_phase;

        *self.state.borrow_mut() = next;
        self.phase.set(next_phase);
        self.settled.set(next_phase);
        if changed {
            self.subscribers.notify();
        }
    }

    /// Entrar en Loading (una carga más en vuelo)
    pub fn begin_loading(&self) {
        self.pending.set(self.pending.get() + 1);
        if self.phase.replace(StorePhase::Loading) != StorePhase::Loading {
            self.subscribers.notify();
        }
    }

    /// Fin de una carga, haya despachado o no. Cuando termina la última y
    /// nadie fijó fase entretanto, se vuelve a la fase anterior.
    pub fn finish_loading(&self) {
        let pending = self.pending.get().saturating_sub(1);
        self.pending.set(pending);
        if pending > 0 || self.phase.get() != StorePhase::Loading {
            return;
        }
        self.phase.set(self.settled.get());
        self.subscribers.notify();
    }
}

impl Default for TicketStore {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{comment, ticket};
    use super::*;

    fn seeded() -> Rc<TicketState> {
        reduce(
            &Rc::new(TicketState::default()),
            TicketAction::SetTickets(vec![ticket("1", "VPN", 0), ticket("2", "Mail", 1)]),
        )
    }

    fn ids(state: &TicketState) -> Vec<String> {
        state.tickets.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn set_tickets_replaces_everything() {
        let state = seeded();
        let next = reduce(&state, TicketAction::SetTickets(vec![ticket("9", "Other", 2)]));
        assert_eq!(ids(&next), vec!["9"]);
    }

    #[test]
    fn add_comment_never_changes_ticket_ids() {
        let state = seeded();
        let next = reduce(&state, TicketAction::AddComment(comment("c1", "2", "hi")));
        let next = reduce(&next, TicketAction::AddComment(comment("c2", "404", "lost")));

        assert_eq!(ids(&next), vec!["1", "2"]);
        assert_eq!(next.find("2").map(|t| t.comments.len()), Some(1));
    }

    #[test]
    fn add_comment_keeps_untouched_tickets_shared() {
        let state = seeded();
        let next = reduce(&state, TicketAction::AddComment(comment("c1", "2", "hi")));

        assert!(Rc::ptr_eq(&state.tickets[0], &next.tickets[0]));
        assert!(!Rc::ptr_eq(&state.tickets[1], &next.tickets[1]));
        assert_eq!(next.tickets[1].comments[0].text, "hi");
    }

    #[test]
    fn unknown_ticket_comment_returns_same_reference() {
        let state = seeded();
        let next = reduce(&state, TicketAction::AddComment(comment("c1", "missing", "x")));
        assert!(Rc::ptr_eq(&state, &next));
    }

    #[test]
    fn add_ticket_twice_keeps_both() {
        let state = seeded();
        let t = ticket("3", "Printer down", 5);
        let next = reduce(&state, TicketAction::AddTicket(t.clone()));
        let next = reduce(&next, TicketAction::AddTicket(t.clone()));

        assert_eq!(next.len(), 4);
        assert_eq!(*next.tickets[0], t);
        assert_eq!(*next.tickets[1], t);
    }

    #[test]
    fn dispatch_moves_phase_and_notifies() {
        let store = TicketStore::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        store.subscribe(move || counter.set(counter.get() + 1));

        store.dispatch(TicketAction::SetTickets(vec![ticket("1", "VPN", 0)]));
        assert_eq!(store.phase(), StorePhase::Ready);
        assert_eq!(hits.get(), 1);

        store.dispatch(TicketAction::Reset);
        assert_eq!(store.phase(), StorePhase::Uninitialized);
        assert!(store.state().is_empty());
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn failed_load_returns_to_settled_phase() {
        let store = TicketStore::new();
        store.dispatch(TicketAction::SetTickets(vec![ticket("1", "VPN", 0)]));
        let before = store.state();

        store.begin_loading();
        assert_eq!(store.phase(), StorePhase::Loading);
        store.finish_loading();

        assert_eq!(store.phase(), StorePhase::Ready);
        assert!(Rc::ptr_eq(&before, &store.state()));
    }

    #[test]
    fn late_failure_does_not_undo_earlier_success() {
        let store = TicketStore::new();

        store.begin_loading();
        store.begin_loading();
        store.dispatch(TicketAction::SetTickets(Vec::new()));
        store.finish_loading();
        store.finish_loading();

        assert_eq!(store.phase(), StorePhase::Ready);
    }

    #[test]
    fn phase_stays_loading_while_another_load_is_pending() {
        let store = TicketStore::new();

        store.begin_loading();
        store.begin_loading();
        store.finish_loading();
        assert_eq!(store.phase(), StorePhase::Loading);

        store.finish_loading();
        assert_eq!(store.phase(), StorePhase::Uninitialized);
    }
}
