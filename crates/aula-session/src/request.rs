//! Session-aware request shaping.
//!
//! Every API call of the tab goes through [`SessionClient`], which forces
//! credential inclusion and attaches the stored session token under
//! [`SESSION_HEADER`]. No retries, no timeouts of its own, no response
//! interpretation.

use aula_core::SESSION_HEADER;
use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::store::SessionStore;

// ── Request Configuration ──

/// Whether cookies travel with a request (the browser `credentials` mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credentials {
    Include,
    #[default]
    SameOrigin,
    Omit,
}

/// HTTP cache behavior requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    #[default]
    Default,
    /// Revalidate with the origin; never answer from a cache.
    NoCache,
}

/// One file in a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FilePart>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub credentials: Credentials,
    pub cache: CacheMode,
    pub body: Body,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            credentials: Credentials::default(),
            cache: CacheMode::default(),
            body: Body::Empty,
        }
    }
}

impl RequestConfig {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::default()
        }
    }

    pub fn with_json(mut self, value: serde_json::Value) -> Self {
        self.set_header("Content-Type", "application/json");
        self.body = Body::Json(value);
        self
    }

    pub fn with_multipart(mut self, parts: Vec<FilePart>) -> Self {
        self.body = Body::Multipart(parts);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_cache(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Insert or replace a header (case-insensitive name match).
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }
}

/// Shape `config` for the current session: credentials always included,
/// and the stored token (if any) attached under [`SESSION_HEADER`]. Other
/// caller headers are kept as given.
pub fn with_session(session: &SessionStore, mut config: RequestConfig) -> RequestConfig {
    config.credentials = Credentials::Include;
    if let Some(token) = session.get() {
        config.set_header(SESSION_HEADER, &token);
    }
    config
}

// ── Transport ──

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("invalid request url {path}: {reason}")]
    InvalidUrl { path: String, reason: String },

    #[error("request body error: {0}")]
    Body(String),

    #[error("network error: {0}")]
    Network(String),
}

/// A received response. Any status, including errors, counts as received.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json_body(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Sends one request, once. Implemented by ReqwestTransport (real) and
/// ScriptedTransport (tests).
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, path: &str, config: RequestConfig)
        -> Result<HttpResponse, TransportError>;
}

// ── Session Client ──

/// A transport bound to the tab's session slot.
pub struct SessionClient<T> {
    transport: T,
    session: SessionStore,
}

impl<T: Transport> SessionClient<T> {
    pub fn new(transport: T, session: SessionStore) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Effective configuration for a request issued now.
    pub fn prepare(&self, config: RequestConfig) -> RequestConfig {
        with_session(&self.session, config)
    }

    /// Send `config` to `path` with the session applied.
    pub async fn fetch(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<HttpResponse, TransportError> {
        let config = self.prepare(config);
        tracing::debug!(
            method = %config.method,
            path,
            session_header = config.header(SESSION_HEADER).is_some(),
            "session request"
        );
        self.transport.send(path, config).await
    }

    /// Send with credentials included but without the session header.
    pub async fn fetch_credentials_only(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<HttpResponse, TransportError> {
        let config = config.with_credentials(Credentials::Include);
        tracing::debug!(method = %config.method, path, "credentials-only request");
        self.transport.send(path, config).await
    }
}
