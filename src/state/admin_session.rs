// ============================================================================
// ADMIN SESSION STORE - Sesión de soporte (independiente de Keycloak)
// ============================================================================
// Persistencia: clave "admin_token" en localStorage (string plano).
// No hay validación contra servidor: la primera petición admin decide.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use async_trait::async_trait;

use crate::error::AdminAuthError;
use crate::services::adapter::CredentialSource;
use crate::state::reactivity::Subscribers;
use crate::utils::{KeyValueStorage, STORAGE_KEY_ADMIN_TOKEN};

/// Quién emite el token admin a partir de usuario/contraseña
#[async_trait(?Send)]
pub trait AdminCredentialIssuer {
    async fn issue(&self, username: &str, password: &str) -> Result<String, AdminAuthError>;
}

/// Emisor local: devuelve siempre el token de desarrollo configurado
/// (el backend lo mapea al support engineer sembrado)
pub struct LocalCredentialIssuer {
    pub token: String,
}

#[async_trait(?Send)]
impl AdminCredentialIssuer for LocalCredentialIssuer {
    async fn issue(&self, _username: &str, _password: &str) -> Result<String, AdminAuthError> {
        if self.token.is_empty() {
            return Err(AdminAuthError::Issuer("no admin token configured".to_string()));
        }
        Ok(self.token.clone())
    }
}

#[derive(Clone)]
pub struct AdminSessionStore {
    storage: Rc<dyn KeyValueStorage>,
    issuer: Rc<dyn AdminCredentialIssuer>,
    authenticated: Rc<Cell<bool>>,
    subscribers: Subscribers,
}

impl AdminSessionStore {
    /// Restaura authenticated=true si la clave ya existe
    pub fn new(storage: Rc<dyn KeyValueStorage>, issuer: Rc<dyn AdminCredentialIssuer>) -> Self {
        let restored = storage.get(STORAGE_KEY_ADMIN_TOKEN).is_some();
        if restored {
            log::info!("✅ [ADMIN-AUTH] Sesión admin restaurada desde storage");
        }
        Self {
            storage,
            issuer,
            authenticated: Rc::new(Cell::new(restored)),
            subscribers: Subscribers::new(),
        }
    }

    pub fn authenticated(&self) -> bool {
        self.authenticated.get()
    }

    /// Se lee del storage en cada llamada (fuente de verdad)
    pub fn token(&self) -> Option<String> {
        self.storage.get(STORAGE_KEY_ADMIN_TOKEN)
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.subscribe(callback);
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), AdminAuthError> {
        if username.trim().is_empty() || password.is_empty() {
            log::warn!("⚠️ [ADMIN-AUTH] Login sin credenciales");
            return Err(AdminAuthError::MissingCredentials);
        }

        log::info!("🔐 [ADMIN-AUTH] Login de {}", username);
        let token = self.issuer.issue(username, password).await?;
        self.storage.set(STORAGE_KEY_ADMIN_TOKEN, &token)?;

        self.authenticated.set(true);
        self.subscribers.notify();
        log::info!("✅ [ADMIN-AUTH] Sesión admin iniciada");
        Ok(())
    }

    pub fn logout(&self) {
        log::info!("👋 [ADMIN-AUTH] Logout admin");
        self.storage.remove(STORAGE_KEY_ADMIN_TOKEN);
        self.authenticated.set(false);
        self.subscribers.notify();
    }
}

impl CredentialSource for AdminSessionStore {
    fn domain(&self) -> &'static str {
        "admin"
    }

    fn bearer_token(&self) -> Option<String> {
        self.token()
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::utils::MemoryStorage;

    fn issuer() -> Rc<dyn AdminCredentialIssuer> {
        Rc::new(LocalCredentialIssuer { token: "dummy_token".to_string() })
    }

    #[test]
    fn fresh_storage_starts_signed_out() {
        let store = AdminSessionStore::new(Rc::new(MemoryStorage::new()), issuer());
        assert!(!store.authenticated());
        assert_eq!(store.token(), None);
    }

    #[test]
    fn stored_key_restores_session() {
        let storage = Rc::new(MemoryStorage::with_entry(STORAGE_KEY_ADMIN_TOKEN, "persisted"));
        let store = AdminSessionStore::new(storage, issuer());
        assert!(store.authenticated());
        assert_eq!(store.bearer_token().as_deref(), Some("persisted"));
    }

    #[test]
    fn unquoted_token_from_another_client_restores_session() {
        let storage = Rc::new(MemoryStorage::with_entry(STORAGE_KEY_ADMIN_TOKEN, "dummy_token"));
        let store = AdminSessionStore::new(storage, issuer());
        assert!(store.authenticated());
        assert_eq!(store.token().as_deref(), Some("dummy_token"));
    }

    #[test]
    fn login_persists_issued_token() {
        let storage = Rc::new(MemoryStorage::new());
        let store = AdminSessionStore::new(storage.clone(), issuer());

        block_on(store.login("agent", "secret")).unwrap();

        assert!(store.authenticated());
        assert_eq!(storage.get(STORAGE_KEY_ADMIN_TOKEN).as_deref(), Some("dummy_token"));
    }

    #[test]
    fn empty_credentials_are_rejected() {
        let storage = Rc::new(MemoryStorage::new());
        let store = AdminSessionStore::new(storage.clone(), issuer());

        let result = block_on(store.login("", "secret"));

        assert_eq!(result, Err(AdminAuthError::MissingCredentials));
        assert!(!store.authenticated());
        assert_eq!(storage.get(STORAGE_KEY_ADMIN_TOKEN), None);
    }

    #[test]
    fn logout_removes_key_synchronously() {
        let storage = Rc::new(MemoryStorage::with_entry(STORAGE_KEY_ADMIN_TOKEN, "t"));
        let store = AdminSessionStore::new(storage.clone(), issuer());
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        store.subscribe(move || counter.set(counter.get() + 1));

        store.logout();

        assert!(!store.authenticated());
        assert_eq!(storage.get(STORAGE_KEY_ADMIN_TOKEN), None);
        assert_eq!(hits.get(), 1);
    }
}
