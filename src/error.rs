// ============================================================================
// ERRORES - Tipos de error del cliente
// ============================================================================
// Los mensajes (Display) se muestran tal cual en la UI
// ============================================================================

use thiserror::Error;

/// Errores de las llamadas HTTP (adaptador público y admin)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No se pudo completar la petición (red caída, CORS, DNS...)
    #[error("Network error: {0}")]
    Network(String),

    /// El backend respondió con un status no-2xx. Se propaga sin traducir.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Parse error: {0}")]
    Parse(String),

    /// La vista que lanzó la petición ya no está montada
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    #[cfg(test)]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

/// Errores del identity provider (Keycloak). Nunca llegan a la UI:
/// el Token Store los absorbe y los convierte en cambios de estado.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),

    #[error("Silent session check failed: {0}")]
    CheckFailed(String),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Login/logout redirect failed: {0}")]
    Redirect(String),
}

/// Errores de acceso a localStorage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Storage error: {0}")]
pub struct StorageError(pub String);

/// Errores del login admin
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminAuthError {
    #[error("Username and password are required")]
    MissingCredentials,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Could not issue admin credential: {0}")]
    Issuer(String),
}
