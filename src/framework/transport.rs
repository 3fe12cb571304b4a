//! # Transport
//!
//! The seam between operations and the network. An operation hands a fully resolved
//! [`HttpRequest`] to a [`Transport`] and gets back whatever the server said, *including* error
//! statuses: deciding what counts as success is the operation's job, not the transport's.
//!
//! [`HttpTransport`] is the production implementation on top of `reqwest`. Tests use
//! [`MockTransport`](crate::framework::mock::MockTransport).

use crate::framework::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// HTTP verbs used by the four operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// Per-call transport settings. Opaque to operations, which pass it through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestConfig {
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Send and store cookies (the session's access and refresh tokens travel as cookies).
    #[serde(default = "default_with_credentials")]
    pub with_credentials: bool,
}

fn default_with_credentials() -> bool {
    true
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            headers: BTreeMap::new(),
            timeout_ms: None,
            with_credentials: true,
        }
    }
}

impl RequestConfig {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// A request with its URL already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
    pub config: RequestConfig,
}

/// Raw answer from the server. `body` is JSON null for empty bodies and a JSON string for
/// bodies that are not JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests on behalf of operations.
///
/// Implementations return `Ok` for every response the server produced, whatever its status, and
/// `Err(ApiError::Transport)` only when no response arrived.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `reqwest`-backed transport.
///
/// Holds two clients: one with a cookie store shared by every credentialed call, so cookies set
/// by `login` and `refresh_access_token` are sent on later calls, and one without. Each request
/// picks its client from [`RequestConfig::with_credentials`].
#[derive(Clone)]
pub struct HttpTransport {
    credentialed: reqwest::Client,
    anonymous: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ApiError> {
        let build = |cookies: bool| {
            reqwest::Client::builder()
                .cookie_store(cookies)
                .build()
                .map_err(|e| ApiError::Transport(e.to_string()))
        };
        Ok(Self::from_clients(build(true)?, build(false)?))
    }

    pub fn from_clients(credentialed: reqwest::Client, anonymous: reqwest::Client) -> Self {
        Self {
            credentialed,
            anonymous,
        }
    }

    fn client_for(&self, config: &RequestConfig) -> &reqwest::Client {
        if config.with_credentials {
            &self.credentialed
        } else {
            &self.anonymous
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client_for(&request.config).request(method, &request.url);
        for (name, value) in &request.config.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(method = %request.method, url = %request.url, status, len = bytes.len(), "Response");

        Ok(HttpResponse::new(status, parse_body(&bytes)))
    }
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bodies_fall_back_to_text() {
        assert_eq!(parse_body(b""), Value::Null);
        assert_eq!(parse_body(br#"{"userId":1}"#), json!({"userId": 1}));
        assert_eq!(
            parse_body(b"Invalid username or password."),
            json!("Invalid username or password.")
        );
    }

    #[test]
    fn request_config_defaults_to_credentials() {
        let config: RequestConfig = serde_json::from_value(json!({})).unwrap();
        assert!(config.with_credentials);
        assert_eq!(config.timeout(), None);

        let config = RequestConfig::default().with_header("X-Client", "admin");
        assert_eq!(config.headers.get("X-Client").map(String::as_str), Some("admin"));
    }

    #[test]
    fn client_follows_per_call_credentials() {
        let transport = HttpTransport::new().unwrap();

        let credentialed = RequestConfig::default();
        assert!(std::ptr::eq(
            transport.client_for(&credentialed),
            &transport.credentialed
        ));

        let anonymous = RequestConfig {
            with_credentials: false,
            ..RequestConfig::default()
        };
        assert!(std::ptr::eq(transport.client_for(&anonymous), &transport.anonymous));
    }
}
