// ============================================================================
// ADMIN API - SOLO COMUNICACIÓN HTTP (dominio admin)
// ============================================================================
// Base URL = {API_URL}/admin. Solo existe sobre HttpAdapter<AdminSessionStore>.
// ============================================================================

use crate::error::ApiError;
use crate::models::{
    AdminComment, AdminTicket, AdminTicketDetail, AdminTicketStatus, NewComment, StatusUpdate,
    Suggestion, VectorSuggestions,
};
use crate::services::adapter::HttpAdapter;
use crate::services::http::HttpRequest;
use crate::state::AdminSessionStore;
use crate::utils::CancelToken;

pub type AdminApi = HttpAdapter<AdminSessionStore>;

/// Filtro server-side de la lista admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminListScope {
    #[default]
    All,
    Unclaimed,
    Mine,
}

impl AdminListScope {
    /// Flag de query que envía el backend (`unclaimed=true` / `mine=true`)
    pub fn query_flag(&self) -> Option<&'static str> {
        match self {
            AdminListScope::All => None,
            AdminListScope::Unclaimed => Some("unclaimed"),
            AdminListScope::Mine => Some("mine"),
        }
    }
}

impl HttpAdapter<AdminSessionStore> {
    /// GET /tickets (?unclaimed=true | ?mine=true)
    pub async fn list_tickets(
        &self,
        scope: AdminListScope,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<AdminTicket>, ApiError> {
        log::info!("📋 [ADMIN-API] Obteniendo tickets ({:?})", scope);
        let mut request = HttpRequest::get(self.url("/tickets"));
        if let Some(flag) = scope.query_flag() {
            request = request.query(flag, "true");
        }
        self.send_json(request, cancel).await
    }

    /// GET /tickets/{id}
    pub async fn get_ticket(&self, id: i64, cancel: Option<&CancelToken>) -> Result<AdminTicketDetail, ApiError> {
        self.send_json(HttpRequest::get(self.url(&format!("/tickets/{}", id))), cancel)
            .await
    }

    /// PATCH /tickets/{id}/claim
    pub async fn claim_ticket(&self, id: i64) -> Result<AdminTicket, ApiError> {
        log::info!("🙋 [ADMIN-API] Reclamando ticket {}", id);
        self.send_json(HttpRequest::patch(self.url(&format!("/tickets/{}/claim", id))), None)
            .await
    }

    /// PATCH /tickets/{id}/status
    pub async fn update_status(&self, id: i64, status: AdminTicketStatus) -> Result<AdminTicket, ApiError> {
        log::info!("🔄 [ADMIN-API] Ticket {} → {}", id, status.label());
        let request = HttpRequest::patch(self.url(&format!("/tickets/{}/status", id)))
            .json(&StatusUpdate { status })?;
        self.send_json(request, None).await
    }

    /// POST /tickets/{id}/comments
    pub async fn add_comment(&self, id: i64, comment: &NewComment) -> Result<AdminComment, ApiError> {
        let request = HttpRequest::post(self.url(&format!("/tickets/{}/comments", id)))
            .json(comment)?;
        self.send_json(request, None).await
    }

    /// GET /tickets/{id}/suggestions
    pub async fn vector_suggestions(
        &self,
        id: i64,
        cancel: Option<&CancelToken>,
    ) -> Result<VectorSuggestions, ApiError> {
        self.send_json(HttpRequest::get(self.url(&format!("/tickets/{}/suggestions", id))), cancel)
            .await
    }

    /// GET /search?query=
    pub async fn search_suggestions(
        &self,
        query: &str,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<Suggestion>, ApiError> {
        let request = HttpRequest::get(self.url("/search")).query("query", query);
        self.send_json(request, cancel).await
    }
}
