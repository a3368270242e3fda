pub mod ticket_viewmodel;
pub mod admin_viewmodel;

pub use ticket_viewmodel::{AuthTransitionTracker, TicketViewModel};
pub use admin_viewmodel::AdminViewModel;
