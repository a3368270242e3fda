pub mod ticket;
pub mod admin;

pub use ticket::{Comment, NewComment, NewTicket, Ticket, TicketStatus};
pub use admin::{
    AdminComment, AdminTicket, AdminTicketDetail, AdminTicketStatus, StatusUpdate, Suggestion,
    VectorSuggestions,
};
