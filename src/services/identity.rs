// ============================================================================
// IDENTITY PROVIDER - Contrato de tokens del proveedor de identidad
// ============================================================================
// Solo se consume el contrato (check silencioso, renovación, login, logout).
// La implementación real delega en keycloak-js vía FFI.
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::config::KeycloakConfig;
use crate::error::IdentityError;
use crate::utils::keycloak_ffi::{js_object, token_expiry_seconds, Keycloak};

/// Token emitido por el proveedor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[async_trait(?Send)]
pub trait IdentityProvider {
    /// "¿Ya hay sesión?" sin forzar login interactivo
    async fn check_sso(&self) -> Result<Option<TokenGrant>, IdentityError>;

    /// Renovar si al token le quedan menos de `min_validity_seconds`
    async fn refresh(&self, min_validity_seconds: u32) -> Result<TokenGrant, IdentityError>;

    /// Redirige al login del proveedor; vuelve a `redirect_uri`
    async fn login(&self, redirect_uri: Option<&str>) -> Result<(), IdentityError>;

    async fn logout(&self, redirect_uri: Option<&str>) -> Result<(), IdentityError>;
}

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

/// Proveedor Keycloak (keycloak-js en window.Keycloak)
pub struct KeycloakProvider {
    client: Keycloak,
}

impl KeycloakProvider {
    pub fn new(config: &KeycloakConfig) -> Result<Self, IdentityError> {
        let options = js_object(&[
            ("url", JsValue::from_str(&config.url)),
            ("realm", JsValue::from_str(&config.realm)),
            ("clientId", JsValue::from_str(&config.client_id)),
        ])
        .map_err(|e| IdentityError::Unavailable(js_error(e)))?;

        let client = Keycloak::new(&options).map_err(|e| IdentityError::Unavailable(js_error(e)))?;
        log::debug!("🔑 [KC] Cliente creado para realm {}", config.realm);
        Ok(Self { client })
    }

    fn current_grant(&self) -> Option<TokenGrant> {
        let token = self.client.token()?;
        let expires_at = token_expiry_seconds(&self.client)
            .and_then(|exp| Utc.timestamp_opt(exp, 0).single());
        Some(TokenGrant { token, expires_at })
    }

    fn redirect_options(redirect_uri: Option<&str>) -> Result<JsValue, IdentityError> {
        match redirect_uri {
            Some(uri) => js_object(&[("redirectUri", JsValue::from_str(uri))])
                .map_err(|e| IdentityError::Redirect(js_error(e))),
            None => Ok(JsValue::UNDEFINED),
        }
    }
}

#[async_trait(?Send)]
impl IdentityProvider for KeycloakProvider {
    async fn check_sso(&self) -> Result<Option<TokenGrant>, IdentityError> {
        let options = js_object(&[
            ("onLoad", JsValue::from_str("check-sso")),
            ("pkceMethod", JsValue::from_str("S256")),
            ("checkLoginIframe", JsValue::FALSE),
        ])
        .map_err(|e| IdentityError::CheckFailed(js_error(e)))?;

        let promise = self
            .client
            .init(&options)
            .map_err(|e| IdentityError::CheckFailed(js_error(e)))?;
        let authenticated = JsFuture::from(promise)
            .await
            .map_err(|e| IdentityError::CheckFailed(js_error(e)))?
            .as_bool()
            .unwrap_or(false);

        log::debug!("🔑 [KC] onReady authenticated={}", authenticated);
        if authenticated {
            Ok(self.current_grant())
        } else {
            Ok(None)
        }
    }

    async fn refresh(&self, min_validity_seconds: u32) -> Result<TokenGrant, IdentityError> {
        let promise = self
            .client
            .update_token(min_validity_seconds)
            .map_err(|e| IdentityError::RefreshFailed(js_error(e)))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| IdentityError::RefreshFailed(js_error(e)))?;

        self.current_grant()
            .ok_or_else(|| IdentityError::RefreshFailed("no token after refresh".to_string()))
    }

    async fn login(&self, redirect_uri: Option<&str>) -> Result<(), IdentityError> {
        let options = Self::redirect_options(redirect_uri)?;
        let promise = self
            .client
            .login(&options)
            .map_err(|e| IdentityError::Redirect(js_error(e)))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| IdentityError::Redirect(js_error(e)))?;
        Ok(())
    }

    async fn logout(&self, redirect_uri: Option<&str>) -> Result<(), IdentityError> {
        let options = Self::redirect_options(redirect_uri)?;
        let promise = self
            .client
            .logout(&options)
            .map_err(|e| IdentityError::Redirect(js_error(e)))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| IdentityError::Redirect(js_error(e)))?;
        Ok(())
    }
}

/// Proveedor sin sesión, para cuando keycloak-js no está disponible:
/// la app sigue funcionando (la superficie admin no depende de él)
pub struct UnavailableProvider {
    pub reason: String,
}

#[async_trait(?Send)]
impl IdentityProvider for UnavailableProvider {
    async fn check_sso(&self) -> Result<Option<TokenGrant>, IdentityError> {
        Err(IdentityError::Unavailable(self.reason.clone()))
    }

    async fn refresh(&self, _min_validity_seconds: u32) -> Result<TokenGrant, IdentityError> {
        Err(IdentityError::Unavailable(self.reason.clone()))
    }

    async fn login(&self, _redirect_uri: Option<&str>) -> Result<(), IdentityError> {
        Err(IdentityError::Unavailable(self.reason.clone()))
    }

    async fn logout(&self, _redirect_uri: Option<&str>) -> Result<(), IdentityError> {
        Ok(())
    }
}
