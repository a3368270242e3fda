// ============================================================================
// TOKEN STORE - Sesión del usuario público (identity provider)
// ============================================================================
// - Solo lectura para el resto de componentes (getters)
// - Ninguna operación devuelve error: los fallos del proveedor se
//   convierten en cambios de estado (authenticated=false)
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::services::adapter::CredentialSource;
use crate::services::identity::{IdentityProvider, TokenGrant};
use crate::state::reactivity::Subscribers;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub authenticated: bool,
}

#[derive(Clone)]
pub struct TokenStore {
    provider: Rc<dyn IdentityProvider>,
    session: Rc<RefCell<Session>>,
    initialized: Rc<Cell<bool>>,
    min_validity_seconds: u32,
    subscribers: Subscribers,
}

impl TokenStore {
    pub fn new(provider: Rc<dyn IdentityProvider>, min_validity_seconds: u32) -> Self {
        Self {
            provider,
            session: Rc::new(RefCell::new(Session::default())),
            initialized: Rc::new(Cell::new(false)),
            min_validity_seconds,
            subscribers: Subscribers::new(),
        }
    }

    /// false mientras el check silencioso está pendiente
    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    pub fn authenticated(&self) -> bool {
        self.session.borrow().authenticated
    }

    pub fn token(&self) -> Option<String> {
        self.session.borrow().token.clone()
    }

    #[cfg(test)]
    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.subscribe(callback);
    }

    /// Check silencioso contra el proveedor ("¿ya estamos logueados?")
    pub async fn init(&self) {
        if self.is_initialized() {
            return;
        }

        match self.provider.check_sso().await {
            Ok(Some(grant)) => {
                log::info!("✅ [TOKEN] Sesión existente detectada");
                self.install(grant);
            }
            Ok(None) => {
                log::info!("ℹ️ [TOKEN] Sin sesión activa en el proveedor");
                self.clear();
            }
            Err(e) => {
                log::warn!("⚠️ [TOKEN] Check silencioso falló: {}", e);
                self.clear();
            }
        }

        self.initialized.set(true);
        self.subscribers.notify();
    }

    /// Redirige al login interactivo. `return_to` = URL absoluta de vuelta.
    pub async fn login(&self, return_to: Option<&str>) {
        log::info!("🔐 [TOKEN] Login interactivo (vuelta a {:?})", return_to);
        if let Err(e) = self.provider.login(return_to).await {
            log::error!("❌ [TOKEN] No se pudo iniciar el login: {}", e);
        }
    }

    pub async fn logout(&self, redirect_uri: Option<&str>) {
        log::info!("👋 [TOKEN] Logout");
        self.clear();
        self.subscribers.notify();
        if let Err(e) = self.provider.logout(redirect_uri).await {
            log::warn!("⚠️ [TOKEN] Logout en el proveedor falló: {}", e);
        }
    }

    /// Renovación programada (antes de expirar) o expiración real.
    /// El token sigue disponible mientras es válido; si la renovación falla,
    /// authenticated pasa a false (los guards redirigen).
    pub async fn handle_expiry(&self) {
        self.handle_expiry_at(Utc::now()).await
    }

    async fn handle_expiry_at(&self, now: DateTime<Utc>) {
        if !self.authenticated() {
            return;
        }
        if self.drop_expired_token(now) {
            log::warn!("⏰ [TOKEN] Token expirado, renovando...");
        } else {
            log::debug!("🔄 [TOKEN] Renovando token antes de expirar");
        }

        match self.provider.refresh(self.min_validity_seconds).await {
            Ok(grant) => {
                log::info!("🔄 [TOKEN] Token renovado");
                self.install(grant);
            }
            Err(e) => {
                log::error!("❌ [TOKEN] Renovación fallida: {}", e);
                self.clear();
            }
        }
        self.subscribers.notify();
    }

    /// Quita el token si ya pasó expires_at. Devuelve si lo quitó.
    fn drop_expired_token(&self, now: DateTime<Utc>) -> bool {
        let mut session = self.session.borrow_mut();
        match session.expires_at {
            Some(expires_at) if expires_at <= now => {
                session.token = None;
                true
            }
            _ => false,
        }
    }

    /// Milisegundos hasta el próximo intento de renovación (None sin expiración conocida)
    pub fn refresh_delay_ms(&self, now: DateTime<Utc>) -> Option<u64> {
        let session = self.session.borrow();
        if !session.authenticated {
            return None;
        }
        let expires_at = session.expires_at?;
        let renew_at = expires_at - chrono::Duration::seconds(i64::from(self.min_validity_seconds));
        let delay = (renew_at - now).num_milliseconds().max(0);
        Some(delay as u64)
    }

    fn install(&self, grant: TokenGrant) {
        *self.session.borrow_mut() = Session {
            token: Some(grant.token),
            expires_at: grant.expires_at,
            authenticated: true,
        };
    }

    fn clear(&self) {
        *self.session.borrow_mut() = Session::default();
    }
}

impl CredentialSource for TokenStore {
    fn domain(&self) -> &'static str {
        "public"
    }

    fn bearer_token(&self) -> Option<String> {
        self.token()
    }
}


#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use futures::executor::block_on;

    use super::testing::{grant, ScriptedProvider};
    use super::*;
    use crate::error::IdentityError;

    fn store_with(provider: ScriptedProvider) -> (TokenStore, Rc<ScriptedProvider>) {
        let provider = Rc::new(provider);
        (TokenStore::new(provider.clone(), 30), provider)
    }

    #[test]
    fn silent_check_with_session_exposes_token() {
        let (store, _) = store_with(ScriptedProvider::signed_in("kc-1"));
        assert!(!store.is_initialized());

        block_on(store.init());

        assert!(store.is_initialized());
        assert!(store.authenticated());
        assert_eq!(store.token().as_deref(), Some("kc-1"));
        assert_eq!(store.bearer_token().as_deref(), Some("kc-1"));
    }

    #[test]
    fn provider_error_is_absorbed_as_unauthenticated() {
        let provider = ScriptedProvider::default();
        *provider.check.borrow_mut() = Some(Err(IdentityError::Unavailable("down".into())));
        let (store, _) = store_with(provider);

        block_on(store.init());

        assert!(store.is_initialized());
        assert!(!store.authenticated());
        assert_eq!(store.token(), None);
    }

    #[test]
    fn expiry_renews_transparently() {
        let (store, provider) = store_with(ScriptedProvider::signed_in("old"));
        block_on(store.init());
        *provider.refresh.borrow_mut() = Some(Ok(grant("new")));

        block_on(store.handle_expiry());

        assert!(store.authenticated());
        assert_eq!(store.token().as_deref(), Some("new"));
    }

    #[test]
    fn failed_renewal_flips_authenticated_and_notifies() {
        let (store, provider) = store_with(ScriptedProvider::signed_in("old"));
        block_on(store.init());
        *provider.refresh.borrow_mut() = Some(Err(IdentityError::RefreshFailed("expired".into())));

        let notified = Rc::new(Cell::new(0));
        let counter = notified.clone();
        store.subscribe(move || counter.set(counter.get() + 1));

        block_on(store.handle_expiry());

        assert!(!store.authenticated());
        assert_eq!(store.token(), None);
        assert_eq!(notified.get(), 1);
    }

    /// Proveedor que anota qué token exponía el store durante el refresh
    struct ObservingProvider {
        store: RefCell<Option<TokenStore>>,
        seen: RefCell<Vec<Option<String>>>,
    }

    #[async_trait::async_trait(?Send)]
    impl IdentityProvider for ObservingProvider {
        async fn check_sso(&self) -> Result<Option<TokenGrant>, IdentityError> {
            Ok(None)
        }

        async fn refresh(&self, _min_validity_seconds: u32) -> Result<TokenGrant, IdentityError> {
            let token = self.store.borrow().as_ref().and_then(TokenStore::token);
            self.seen.borrow_mut().push(token);
            Ok(grant("renewed"))
        }

        async fn login(&self, _redirect_uri: Option<&str>) -> Result<(), IdentityError> {
            Ok(())
        }

        async fn logout(&self, _redirect_uri: Option<&str>) -> Result<(), IdentityError> {
            Ok(())
        }
    }

    fn observed_store(expires_at: DateTime<Utc>) -> (TokenStore, Rc<ObservingProvider>) {
        let provider = Rc::new(ObservingProvider { store: RefCell::new(None), seen: RefCell::new(Vec::new()) });
        let store = TokenStore::new(provider.clone(), 30);
        store.install(TokenGrant { token: "current".into(), expires_at: Some(expires_at) });
        *provider.store.borrow_mut() = Some(store.clone());
        (store, provider)
    }

    #[test]
    fn early_renewal_keeps_valid_token_in_flight() {
        let expires_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 5, 0).unwrap();
        let (store, provider) = observed_store(expires_at);

        let before_expiry = Utc.with_ymd_and_hms(2024, 5, 1, 12, 4, 30).unwrap();
        block_on(store.handle_expiry_at(before_expiry));

        assert_eq!(*provider.seen.borrow(), vec![Some("current".to_string())]);
        assert_eq!(store.token().as_deref(), Some("renewed"));
        *provider.store.borrow_mut() = None;
    }

    #[test]
    fn expired_token_is_cleared_before_renewal() {
        let expires_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 5, 0).unwrap();
        let (store, provider) = observed_store(expires_at);

        let after_expiry = Utc.with_ymd_and_hms(2024, 5, 1, 12, 6, 0).unwrap();
        block_on(store.handle_expiry_at(after_expiry));

        assert_eq!(*provider.seen.borrow(), vec![None]);
        assert!(store.authenticated());
        *provider.store.borrow_mut() = None;
    }

    #[test]
    fn logout_clears_session_and_calls_provider() {
        let (store, provider) = store_with(ScriptedProvider::signed_in("kc"));
        block_on(store.init());

        block_on(store.logout(None));

        assert_eq!(store.session(), Session::default());
        assert_eq!(*provider.logouts.borrow(), 1);
    }

    #[test]
    fn refresh_delay_accounts_for_min_validity() {
        let provider = ScriptedProvider::default();
        let expires_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 5, 0).unwrap();
        *provider.check.borrow_mut() = Some(Ok(Some(TokenGrant {
            token: "kc".into(),
            expires_at: Some(expires_at),
        })));
        let (store, _) = store_with(provider);
        block_on(store.init());

        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(store.refresh_delay_ms(now), Some((300 - 30) * 1000));

        let late = Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap();
        assert_eq!(store.refresh_delay_ms(late), Some(0));
    }
}
