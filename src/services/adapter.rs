// ============================================================================
// HTTP ADAPTER - Un adaptador por dominio de autenticación
// ============================================================================
// HttpAdapter<TokenStore>        → API pública (token Keycloak)
// HttpAdapter<AdminSessionStore> → API admin (token local)
// Cada adaptador posee UNA fuente de credenciales: no puede leer la otra.
// ============================================================================

use std::rc::Rc;

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::services::http::{GlooTransport, HttpRequest, HttpResponse, HttpTransport, AUTHORIZATION_HEADER};
use crate::utils::CancelToken;

/// Fuente del token bearer de un dominio
pub trait CredentialSource {
    /// Nombre del dominio para logs ("public" / "admin")
    fn domain(&self) -> &'static str;
    fn bearer_token(&self) -> Option<String>;
}

#[derive(Clone)]
pub struct HttpAdapter<C: CredentialSource> {
    base_url: String,
    credentials: C,
    transport: Rc<dyn HttpTransport>,
}

impl<C: CredentialSource> HttpAdapter<C> {
    pub fn new(base_url: impl Into<String>, credentials: C) -> Self {
        Self::with_transport(base_url, credentials, Rc::new(GlooTransport))
    }

    pub fn with_transport(
        base_url: impl Into<String>,
        credentials: C,
        transport: Rc<dyn HttpTransport>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Interceptor: adjunta el token del dominio si existe.
    /// Sin token la petición sale sin autenticar y el backend decide (401).
    pub fn intercept(&self, request: HttpRequest) -> HttpRequest {
        match self.credentials.bearer_token() {
            Some(token) => request.header(AUTHORIZATION_HEADER, &format!("Bearer {}", token)),
            None => {
                log::debug!(
                    "🔓 [API:{}] {} {} sin token",
                    self.credentials.domain(),
                    request.method.as_str(),
                    request.url
                );
                request
            }
        }
    }

    /// Enviar petición interceptada. Errores sin reintentos ni traducción.
    pub async fn send(
        &self,
        request: HttpRequest,
        cancel: Option<&CancelToken>,
    ) -> Result<HttpResponse, ApiError> {
        let request = self.intercept(request);
        let method = request.method;
        let url = request.url.clone();

        let response = self.transport.send(request, cancel).await?;
        if !response.ok() {
            log::warn!(
                "⚠️ [API:{}] {} {} → HTTP {}",
                self.credentials.domain(),
                method.as_str(),
                url,
                response.status
            );
        }
        response.error_for_status()
    }

    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        cancel: Option<&CancelToken>,
    ) -> Result<T, ApiError> {
        self.send(request, cancel).await?.json::<T>()
    }
}


#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::testing::{RecordingTransport, StaticCredentials};
    use super::*;

    #[test]
    fn attaches_bearer_when_token_present() {
        let transport = RecordingTransport::new();
        transport.respond(200, "[]");
        let adapter = HttpAdapter::with_transport("http://api/", StaticCredentials(Some("abc")), transport.clone());

        let tickets: Vec<serde_json::Value> =
            block_on(adapter.send_json(HttpRequest::get(adapter.url("/tickets")), None)).unwrap();

        assert!(tickets.is_empty());
        let sent = transport.last_request();
        assert_eq!(sent.url, "http://api/tickets");
        assert_eq!(sent.header_value("Authorization"), Some("Bearer abc"));
    }

    #[test]
    fn sends_unauthenticated_and_propagates_401() {
        let transport = RecordingTransport::new();
        transport.respond(401, "Not authenticated");
        let adapter = HttpAdapter::with_transport("http://api", StaticCredentials(None), transport.clone());

        let err = block_on(adapter.send(HttpRequest::get(adapter.url("/tickets")), None)).unwrap_err();

        assert_eq!(err, ApiError::Http { status: 401, body: "Not authenticated".into() });
        assert_eq!(transport.last_request().header_value("Authorization"), None);
        // sin reintentos
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn parse_errors_are_reported() {
        let transport = RecordingTransport::new();
        transport.respond(200, "not json");
        let adapter = HttpAdapter::with_transport("http://api", StaticCredentials(None), transport);

        let err = block_on(adapter.send_json::<Vec<String>>(HttpRequest::get("http://api/tickets"), None))
            .unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}
