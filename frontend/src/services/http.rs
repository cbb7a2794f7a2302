//! HTTP transport.
//!
//! [`Transport`] is the seam between the handlers and the browser's fetch.
//! [`FetchTransport`] sends every request with `credentials: include` so the
//! session cookie travels along.

use gloo_net::http::{Request, RequestBuilder};
use web_sys::{FormData, RequestCredentials};

use crate::config::ClientConfig;
use crate::types::{AppError, AppResult};

/// HTTP method of an API call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Request body.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody<F> {
    Empty,
    Json(serde_json::Value),
    /// Multipart form data.
    Form(F),
}

/// An API call, before it reaches the wire.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest<F> {
    pub method: Method,
    /// Path relative to the API base, or an absolute URL.
    pub path: String,
    pub body: RequestBody<F>,
}

impl<F> ApiRequest<F> {
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: RequestBody::Empty,
        }
    }

    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    pub fn form(mut self, form: F) -> Self {
        self.body = RequestBody::Form(form);
        self
    }
}

/// Status and body of a completed exchange.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for 2xx statuses.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends API requests.
///
/// An `Err` means the exchange itself failed; any status the server
/// answers with is an `Ok`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Multipart payload type.
    type Form;

    async fn send(&self, request: ApiRequest<Self::Form>) -> AppResult<ApiResponse>;
}

/// Browser fetch transport.
#[derive(Clone, Debug)]
pub struct FetchTransport {
    config: ClientConfig,
}

impl FetchTransport {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.url(path);
        let builder = match method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
        };
        builder.credentials(RequestCredentials::Include)
    }
}

impl Transport for FetchTransport {
    type Form = FormData;

    async fn send(&self, request: ApiRequest<FormData>) -> AppResult<ApiResponse> {
        let builder = self.builder(request.method, &request.path);

        let prepared = match request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(form) => builder.body(form),
        }
        .map_err(|e| AppError::Network(format!("failed to build request: {}", e)))?;

        let response = prepared
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        log::debug!("🌐 {:?} {} -> {}", request.method, request.path, status);

        Ok(ApiResponse { status, body })
    }
}
