pub mod app;
pub mod layout;
pub mod login;
pub mod dashboard;
pub mod tickets;
pub mod admin_tickets;

pub use app::{render_pending, render_route};
