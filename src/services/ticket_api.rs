// ============================================================================
// TICKET API - SOLO COMUNICACIÓN HTTP (dominio público)
// ============================================================================
// Solo existe sobre HttpAdapter<TokenStore>: el token es siempre el de Keycloak
// ============================================================================

use crate::error::ApiError;
use crate::models::{Comment, NewComment, NewTicket, Ticket};
use crate::services::adapter::HttpAdapter;
use crate::services::http::HttpRequest;
use crate::state::TokenStore;
use crate::utils::CancelToken;

pub type PublicApi = HttpAdapter<TokenStore>;

impl HttpAdapter<TokenStore> {
    /// GET /tickets
    pub async fn list_tickets(&self, cancel: Option<&CancelToken>) -> Result<Vec<Ticket>, ApiError> {
        log::info!("📋 [API] Obteniendo tickets del usuario");
        self.send_json(HttpRequest::get(self.url("/tickets")), cancel).await
    }

    /// GET /tickets/{id}
    pub async fn get_ticket(&self, id: &str, cancel: Option<&CancelToken>) -> Result<Ticket, ApiError> {
        self.send_json(HttpRequest::get(self.url(&format!("/tickets/{}", id))), cancel)
            .await
    }

    /// POST /tickets
    pub async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, ApiError> {
        log::info!("📝 [API] Creando ticket: {}", ticket.title);
        let request = HttpRequest::post(self.url("/tickets")).json(ticket)?;
        self.send_json(request, None).await
    }

    /// POST /tickets/{id}/comments
    pub async fn add_comment(&self, ticket_id: &str, comment: &NewComment) -> Result<Comment, ApiError> {
        log::info!("💬 [API] Añadiendo comentario al ticket {}", ticket_id);
        let request = HttpRequest::post(self.url(&format!("/tickets/{}/comments", ticket_id)))
            .json(comment)?;
        self.send_json(request, None).await
    }
}
