// ============================================================================
// ADMIN VIEWMODEL - LÓGICA DE LA SUPERFICIE DE SOPORTE
// ============================================================================
// Único escritor del AdminTicketsStore. Errores locales a cada vista,
// sin reintentos. Las sugerencias se piden SOLO cuando el detalle ya llegó.
// ============================================================================

use crate::error::ApiError;
use crate::models::{AdminTicketStatus, NewComment};
use crate::services::{AdminApi, AdminListScope};
use crate::state::AdminTicketsStore;
use crate::utils::CancelToken;

fn was_cancelled(cancel: Option<&CancelToken>) -> bool {
    cancel.map(CancelToken::is_cancelled).unwrap_or(false)
}

#[derive(Clone)]
pub struct AdminViewModel {
    api: AdminApi,
    store: AdminTicketsStore,
}

impl AdminViewModel {
    pub fn new(api: AdminApi, store: AdminTicketsStore) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &AdminTicketsStore {
        &self.store
    }

    pub async fn load_tickets(&self, scope: AdminListScope, cancel: Option<&CancelToken>) {
        self.store.begin_list(scope);

        match self.api.list_tickets(scope, cancel).await {
            Ok(_) | Err(ApiError::Cancelled) if was_cancelled(cancel) => {
                log::debug!("🛑 [ADMIN] Lista descartada (vista desmontada)");
            }
            Ok(tickets) => {
                log::info!("✅ [ADMIN] {} tickets ({:?})", tickets.len(), scope);
                self.store.set_list(tickets);
            }
            Err(e) => {
                log::error!("❌ [ADMIN] Error cargando tickets: {}", e);
                self.store.fail_list(e.to_string());
            }
        }
    }

    /// Reclamar: solo se sustituye la entrada con ese id
    pub async fn claim(&self, id: i64) -> Result<(), ApiError> {
        let updated = self.api.claim_ticket(id).await?;
        log::info!("🙋 [ADMIN] Ticket {} reclamado", id);
        self.store.apply_update(updated);
        Ok(())
    }

    /// Detalle y, después, sugerencias vectoriales
    pub async fn load_ticket(&self, id: i64, cancel: Option<&CancelToken>) {
        self.store.begin_page();

        let detail = match self.api.get_ticket(id, cancel).await {
            Ok(_) | Err(ApiError::Cancelled) if was_cancelled(cancel) => return,
            Ok(detail) => detail,
            Err(e) => {
                log::error!("❌ [ADMIN] Error cargando ticket {}: {}", id, e);
                self.store.fail_page(e.to_string());
                return;
            }
        };
        self.store.set_detail(detail);

        self.store.set_suggestions_loading(true);
        match self.api.vector_suggestions(id, cancel).await {
            Ok(_) | Err(ApiError::Cancelled) if was_cancelled(cancel) => {}
            Ok(suggestions) => self.store.set_suggestions(suggestions),
            Err(e) => {
                log::warn!("⚠️ [ADMIN] Sin sugerencias para {}: {}", id, e);
                self.store.set_suggestions(Default::default());
            }
        }
    }

    pub async fn update_status(&self, id: i64, status: AdminTicketStatus) -> Result<(), ApiError> {
        match self.api.update_status(id, status).await {
            Ok(updated) => {
                self.store.set_notice(None);
                self.store.apply_update(updated);
                Ok(())
            }
            Err(e) => {
                self.store.set_notice(Some(e.to_string()));
                Err(e)
            }
        }
    }

    pub async fn add_comment(&self, id: i64, text: &str) -> Result<(), ApiError> {
        let body = NewComment { text: text.trim().to_string() };
        match self.api.add_comment(id, &body).await {
            Ok(comment) => {
                self.store.push_comment(comment);
                Ok(())
            }
            Err(e) => {
                self.store.set_notice(Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Búsqueda libre en el histórico de soluciones
    pub async fn search(&self, query: &str, cancel: Option<&CancelToken>) {
        let query = query.trim();
        if query.is_empty() {
            self.store.set_search("", Vec::new());
            return;
        }

        match self.api.search_suggestions(query, cancel).await {
            Ok(_) | Err(ApiError::Cancelled) if was_cancelled(cancel) => {}
            Ok(results) => self.store.set_search(query, results),
            Err(e) => {
                log::error!("❌ [ADMIN] Búsqueda fallida: {}", e);
                self.store.set_notice(Some(e.to_string()));
            }
        }
    }

    /// Logout admin: se olvida la caché admin
    pub fn sign_out(&self) {
        self.api.credentials().logout();
        self.store.clear();
    }
}
