//! # Mock Transport & Testing Guide
//!
//! [`MockTransport`] implements [`Transport`] entirely in memory. Tests script the answers the
//! "server" gives, hand the mock to real operations and authenticators, and then check which
//! calls were made. No sockets, no HTTP server.
//!
//! ## When to use the mock vs a real server
//!
//! | Feature | MockTransport | Real backend |
//! |---------|---------------|--------------|
//! | **Speed** | Instant (plus scripted delays) | Network bound |
//! | **Determinism** | Scripted answers, scripted timing | Subject to server state |
//! | **Error Injection** | `respond(401, ..)`, `fail(..)`, `pending()` | Hard |
//! | **Use Case** | Operation semantics, authenticator FSM | End-to-end smoke tests |
//!
//! ## Example
//!
//! ```rust
//! use review_client::framework::mock::MockTransport;
//! use review_client::framework::{Find, Method, OperationClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockTransport::new();
//!     mock.expect(Method::Get, "http://api.test/directors")
//!         .respond(200, json!([{"id": 1, "name": "Agnes Varda"}]));
//!
//!     let directors = Find::<serde_json::Value>::spawn("http://api.test/directors", mock.shared());
//!     directors.find(None, None).await.unwrap();
//!
//!     let outcome = directors.settled().await.unwrap().unwrap();
//!     assert_eq!(outcome.status, 200);
//!     mock.verify();
//! }
//! ```
//!
//! ## Matching
//!
//! Each incoming request consumes the *first unconsumed* expectation with the same method and URL,
//! so independent calls can be scripted in any order. A request with no matching expectation fails
//! with [`ApiError::Transport`] and is reported by [`MockTransport::verify`].

use crate::framework::error::ApiError;
use crate::framework::transport::{HttpRequest, HttpResponse, Method, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a scripted expectation answers with.
#[derive(Debug, Clone)]
enum Reply {
    Respond(HttpResponse),
    Fail(String),
    Pending,
}

#[derive(Debug, Clone)]
struct Expectation {
    method: Method,
    url: String,
    delay: Duration,
    reply: Reply,
}

#[derive(Default)]
struct MockState {
    expectations: Vec<Expectation>,
    calls: Vec<HttpRequest>,
    unexpected: Vec<String>,
}

/// Scripted in-memory transport. Clones share the same script and call log.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mock as a trait object, ready to hand to operations.
    pub fn shared(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }

    /// Starts scripting the answer to one `method url` request.
    pub fn expect(&self, method: Method, url: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            state: Arc::clone(&self.state),
            method,
            url: url.into(),
            delay: Duration::ZERO,
        }
    }

    /// Every request received so far, in arrival order.
    pub fn calls(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of requests received for `method url`.
    pub fn calls_to(&self, method: Method, url: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| call.method == method && call.url == url)
            .count()
    }

    /// Panics if an expectation was never used or a request arrived unscripted.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.unexpected.is_empty() {
            panic!("Unexpected requests: {:?}", state.unexpected);
        }
        if !state.expectations.is_empty() {
            let remaining: Vec<String> = state
                .expectations
                .iter()
                .map(|e| format!("{} {}", e.method, e.url))
                .collect();
            panic!(
                "Not all expectations were met. {} remaining: {:?}",
                remaining.len(),
                remaining
            );
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let expectation = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(request.clone());
            let position = state
                .expectations
                .iter()
                .position(|e| e.method == request.method && e.url == request.url);
            match position {
                Some(index) => state.expectations.remove(index),
                None => {
                    let call = format!("{} {}", request.method, request.url);
                    state.unexpected.push(call.clone());
                    return Err(ApiError::Transport(format!("no expectation for {call}")));
                }
            }
        };

        if !expectation.delay.is_zero() {
            tokio::time::sleep(expectation.delay).await;
        }
        match expectation.reply {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(message) => Err(ApiError::Transport(message)),
            Reply::Pending => std::future::pending().await,
        }
    }
}

/// Builder returned by [`MockTransport::expect`]. The expectation is registered by the
/// terminal call (`respond`, `fail` or `pending`).
pub struct ExpectationBuilder {
    state: Arc<Mutex<MockState>>,
    method: Method,
    url: String,
    delay: Duration,
}

impl ExpectationBuilder {
    /// Answers only after `delay` has elapsed.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Answers with `status` and `body`.
    pub fn respond(self, status: u16, body: Value) {
        self.register(Reply::Respond(HttpResponse::new(status, body)));
    }

    /// Fails as if the connection broke.
    pub fn fail(self, message: impl Into<String>) {
        self.register(Reply::Fail(message.into()));
    }

    /// Never answers.
    pub fn pending(self) {
        self.register(Reply::Pending);
    }

    fn register(self, reply: Reply) {
        self.state.lock().unwrap().expectations.push(Expectation {
            method: self.method,
            url: self.url,
            delay: self.delay,
            reply,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::transport::RequestConfig;
    use serde_json::json;

    fn get(url: &str) -> HttpRequest {
        HttpRequest {
            method: Method::Get,
            url: url.to_string(),
            body: None,
            config: RequestConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_matches_by_method_and_url() {
        let mock = MockTransport::new();
        mock.expect(Method::Get, "http://api.test/b").respond(200, json!("b"));
        mock.expect(Method::Get, "http://api.test/a").respond(200, json!("a"));

        let a = mock.send(get("http://api.test/a")).await.unwrap();
        let b = mock.send(get("http://api.test/b")).await.unwrap();

        assert_eq!(a.body, json!("a"));
        assert_eq!(b.body, json!("b"));
        assert_eq!(mock.calls_to(Method::Get, "http://api.test/a"), 1);
        mock.verify();
    }

    #[tokio::test]
    async fn test_unscripted_request_is_a_transport_error() {
        let mock = MockTransport::new();
        let result = mock.send(get("http://api.test/nowhere")).await;
        assert!(matches!(result, Err(ApiError::Transport(_))));
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_verify_reports_unused_expectations() {
        let mock = MockTransport::new();
        mock.expect(Method::Delete, "http://api.test/users/1")
            .respond(204, Value::Null);
        mock.verify();
    }
}
