// ============================================================================
// HTTP - Petición/respuesta como datos + transporte intercambiable
// ============================================================================
// El transporte real usa gloo-net. Los adaptadores construyen HttpRequest
// (inspeccionable en tests) y el transporte solo lo envía.
// ============================================================================

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::utils::CancelToken;

pub const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::Patch, url)
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Establecer cabecera (reemplaza si ya existe)
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    #[cfg(test)]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Token bearer adjunto, si lo hay
    #[cfg(test)]
    pub fn bearer_token(&self) -> Option<&str> {
        self.header_value(AUTHORIZATION_HEADER)
            .and_then(|value| value.strip_prefix("Bearer "))
    }

    pub fn json<T: Serialize>(self, body: &T) -> Result<Self, ApiError> {
        let json = serde_json::to_string(body)
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut request = self.header("Content-Type", "application/json");
        request.body = Some(json);
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    #[cfg(test)]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: String::new(),
            body: body.into(),
        }
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 2xx → Ok(self); cualquier otro status → ApiError::Http sin traducir
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.ok() {
            Ok(self)
        } else {
            let body = if self.body.is_empty() { self.status_text } else { self.body };
            Err(ApiError::Http { status: self.status, body })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Transporte HTTP. Single-thread (WASM): sin Send.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(
        &self,
        request: HttpRequest,
        cancel: Option<&CancelToken>,
    ) -> Result<HttpResponse, ApiError>;
}

/// Transporte real del navegador (fetch vía gloo-net)
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

impl GlooTransport {
    fn builder(request: &HttpRequest) -> RequestBuilder {
        let builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Patch => Request::patch(&request.url),
        };
        let builder = request
            .headers
            .iter()
            .fold(builder, |builder, (name, value)| builder.header(name, value));
        if request.query.is_empty() {
            builder
        } else {
            builder.query(request.query.iter().map(|(key, value)| (key.as_str(), value.as_str())))
        }
    }
}

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(
        &self,
        request: HttpRequest,
        cancel: Option<&CancelToken>,
    ) -> Result<HttpResponse, ApiError> {
        if cancel.map(CancelToken::is_cancelled).unwrap_or(false) {
            return Err(ApiError::Cancelled);
        }

        let mut builder = Self::builder(&request);

        // Enlazar el CancelToken con un AbortController del navegador
        let controller = match cancel {
            Some(token) => {
                let controller = web_sys::AbortController::new()
                    .map_err(|e| ApiError::Network(format!("{:?}", e)))?;
                builder = builder.abort_signal(Some(&controller.signal()));
                let abort = controller.clone();
                token.on_cancel(move || abort.abort());
                Some(controller)
            }
            None => None,
        };

        let prepared = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Serialization(e.to_string()))?;

        let result = prepared.send().await;
        drop(controller);

        let response = match result {
            Ok(response) => response,
            Err(_) if cancel.map(CancelToken::is_cancelled).unwrap_or(false) => {
                return Err(ApiError::Cancelled);
            }
            Err(e) => return Err(ApiError::Network(e.to_string())),
        };

        let status = response.status();
        let status_text = response.status_text();
        let body = response.text().await.unwrap_or_default();

        Ok(HttpResponse { status, status_text, body })
    }
}
