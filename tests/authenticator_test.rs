use review_client::auth::{AuthFailure, AuthPhase, Authenticator};
use review_client::framework::mock::MockTransport;
use review_client::framework::{Method, RequestConfig};
use review_client::model::{User, UserRole};
use serde_json::{json, Value};
use std::time::Duration;

const PING: &str = "http://api.test/auth/ping";
const REFRESH: &str = "http://api.test/auth/refresh_access_token";

fn authenticator(mock: &MockTransport) -> Authenticator {
    Authenticator::spawn(PING, REFRESH, RequestConfig::default(), mock.shared())
}

fn identity(user_id: i64) -> Value {
    json!({"userId": user_id, "roles": ["User"]})
}

/// Valid session: one ping, no refresh.
#[tokio::test]
async fn test_ping_ok_authenticates() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, PING).respond(200, identity(7));

    let auth = authenticator(&mock);
    let phase = auth.authenticate_and_wait().await.expect("Authenticator closed");

    assert_eq!(phase, AuthPhase::Authenticated(User::new(7, &[UserRole::User])));
    assert!(auth.authenticated());
    assert!(!auth.loading());
    assert_eq!(auth.user().map(|u| u.user_id), Some(7));
    assert_eq!(auth.failure_reason(), None);
    assert_eq!(mock.calls_to(Method::Get, PING), 1);
    assert_eq!(mock.calls_to(Method::Post, REFRESH), 0);
    mock.verify();
}

/// Expired access token: ping 401, refresh 200, ping 200.
#[tokio::test]
async fn test_expired_session_is_renewed_once() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, PING).respond(401, Value::Null);
    mock.expect(Method::Post, REFRESH).respond(200, Value::Null);
    mock.expect(Method::Get, PING).respond(200, identity(7));

    let auth = authenticator(&mock);
    let phase = auth.authenticate_and_wait().await.unwrap();

    assert!(matches!(phase, AuthPhase::Authenticated(_)));
    assert!(auth.authenticated());
    assert_eq!(mock.calls_to(Method::Post, REFRESH), 1);
    assert_eq!(mock.calls_to(Method::Get, PING), 2);
    mock.verify();
}

/// Expired refresh token: ping 401, refresh 401.
#[tokio::test]
async fn test_refresh_unauthorized_fails() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, PING).respond(401, Value::Null);
    mock.expect(Method::Post, REFRESH).respond(401, Value::Null);

    let auth = authenticator(&mock);
    let phase = auth.authenticate_and_wait().await.unwrap();

    assert_eq!(phase, AuthPhase::Failed(AuthFailure::Unauthorized));
    assert_eq!(auth.failure_reason(), Some(AuthFailure::Unauthorized));
    assert!(!auth.loading());
    assert!(!auth.authenticated());
    assert_eq!(auth.user(), None);
    assert_eq!(mock.calls_to(Method::Post, REFRESH), 1);
    mock.verify();
}

#[tokio::test]
async fn test_ping_forbidden_skips_refresh() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, PING).respond(403, Value::Null);

    let auth = authenticator(&mock);
    let phase = auth.authenticate_and_wait().await.unwrap();

    assert_eq!(phase, AuthPhase::Failed(AuthFailure::Forbidden));
    assert_eq!(mock.calls_to(Method::Post, REFRESH), 0);
    mock.verify();
}

#[tokio::test]
async fn test_refresh_forbidden_fails() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, PING).respond(401, Value::Null);
    mock.expect(Method::Post, REFRESH).respond(403, Value::Null);

    let auth = authenticator(&mock);
    let phase = auth.authenticate_and_wait().await.unwrap();

    assert_eq!(phase, AuthPhase::Failed(AuthFailure::Forbidden));
    assert_eq!(mock.calls_to(Method::Get, PING), 1);
}

#[tokio::test]
async fn test_server_and_network_failures_are_other() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, PING).respond(500, json!("Internal Server Error"));
    mock.expect(Method::Get, PING).respond(401, Value::Null);
    mock.expect(Method::Post, REFRESH).fail("connection reset");

    let auth = authenticator(&mock);
    assert_eq!(
        auth.authenticate_and_wait().await.unwrap(),
        AuthPhase::Failed(AuthFailure::Other)
    );
    assert_eq!(
        auth.authenticate_and_wait().await.unwrap(),
        AuthPhase::Failed(AuthFailure::Other)
    );
    mock.verify();
}

/// A new call resets the previous outcome.
#[tokio::test]
async fn test_authenticate_again_starts_over() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, PING).respond(200, identity(7));
    mock.expect(Method::Get, PING)
        .delay(Duration::from_millis(50))
        .respond(403, Value::Null);

    let auth = authenticator(&mock);
    assert!(matches!(
        auth.authenticate_and_wait().await.unwrap(),
        AuthPhase::Authenticated(_)
    ));

    auth.authenticate().await.unwrap();
    assert!(auth.loading());
    assert_eq!(auth.user(), None);
    assert_eq!(auth.failure_reason(), None);

    assert_eq!(
        auth.outcome().await.unwrap(),
        AuthPhase::Failed(AuthFailure::Forbidden)
    );
    assert_eq!(auth.user(), None);
}

#[tokio::test]
async fn test_reports_refreshing_while_renewing() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, PING).respond(401, Value::Null);
    mock.expect(Method::Post, REFRESH)
        .delay(Duration::from_millis(100))
        .respond(200, Value::Null);
    mock.expect(Method::Get, PING).respond(200, identity(9));

    let auth = authenticator(&mock);
    auth.authenticate().await.unwrap();

    tokio::time::sleep(Duration::from_millis(40)).await;
    assert_eq!(auth.phase(), AuthPhase::Refreshing);
    assert!(auth.loading());
    assert_eq!(auth.user(), None);

    let phase = auth.outcome().await.unwrap();
    assert_eq!(phase.user().map(|u| u.user_id), Some(9));
    assert!(!auth.loading());
}

/// Only the newest call's outcome is reported; the superseded pass restarts with a fresh ping.
#[tokio::test]
async fn test_newer_call_supersedes_running_pass() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, PING)
        .delay(Duration::from_millis(80))
        .respond(200, identity(1));
    mock.expect(Method::Get, PING).respond(200, identity(2));

    let auth = authenticator(&mock);
    let first = auth.authenticate().await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = auth.authenticate().await.unwrap();
    assert!(second > first);

    let phase = auth.outcome().await.unwrap();
    assert_eq!(phase.user().map(|u| u.user_id), Some(2));

    let state = auth.subscribe().borrow().clone();
    assert_eq!(state.generation, second);
    assert_eq!(mock.calls_to(Method::Get, PING), 2);
    mock.verify();
}

/// Concurrent waiters all observe the same final outcome.
#[tokio::test]
async fn test_clones_share_state() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, PING)
        .delay(Duration::from_millis(30))
        .respond(200, identity(5));

    let auth = authenticator(&mock);
    let watcher = auth.clone();
    auth.authenticate().await.unwrap();

    let (a, b) = tokio::join!(auth.outcome(), watcher.outcome());
    assert_eq!(a.unwrap(), b.unwrap());
    assert!(watcher.authenticated());
}

/// A call cancelled while the mailbox is full takes no generation, so the outcome still resolves.
#[tokio::test]
async fn test_cancelled_call_does_not_strand_outcome() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, PING)
        .delay(Duration::from_millis(200))
        .respond(200, identity(1));
    mock.expect(Method::Get, PING).respond(200, identity(2));

    let auth = authenticator(&mock);
    auth.authenticate().await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    // The actor is busy pinging; these fill the mailbox.
    let mut delivered = Vec::new();
    for _ in 0..review_client::auth::DEFAULT_BUFFER {
        delivered.push(auth.authenticate().await.unwrap());
    }
    let cancelled = tokio::time::timeout(Duration::from_millis(10), auth.authenticate()).await;
    assert!(cancelled.is_err());

    let phase = tokio::time::timeout(Duration::from_secs(1), auth.outcome())
        .await
        .expect("Outcome never resolved")
        .unwrap();
    assert_eq!(phase.user().map(|u| u.user_id), Some(2));
    assert_eq!(auth.subscribe().borrow().generation, *delivered.last().unwrap());
    assert!(!auth.loading());
    mock.verify();
}
