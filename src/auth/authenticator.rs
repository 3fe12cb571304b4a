//! # Session Authenticator
//!
//! Establishes whether the caller holds a valid session and renews it once if it has expired.
//!
//! ## Protocol
//!
//! ```text
//! authenticate() -> Pinging
//! Pinging    --200-->            Authenticated(user)
//! Pinging    --401 (1st)-->      Refreshing
//! Pinging    --401 (2nd)-->      Failed(Unauthorized)
//! Pinging    --403-->            Failed(Forbidden)
//! Pinging    --anything else-->  Failed(Other)
//! Refreshing --200-->            Pinging
//! Refreshing --401-->            Failed(Unauthorized)
//! Refreshing --403-->            Failed(Forbidden)
//! Refreshing --anything else-->  Failed(Other)
//! ```
//!
//! ## Structure
//!
//! [`AuthenticatorActor`] owns the ping and refresh operations and runs each pass as one
//! sequential routine, so at most one ping and one refresh are ever in flight and the "already
//! renewed" flag is a local of the pass. State is published on a `watch` channel tagged with the
//! generation of the `authenticate()` call it answers. A newer call arriving mid-pass restarts the
//! pass from a fresh ping as soon as the current step settles; only the latest call's outcome is
//! ever reported as terminal.

use crate::auth::error::AuthError;
use crate::auth::state::{AuthFailure, AuthPhase, AuthState};
use crate::framework::{
    ApiError, Find, OperationClient, OperationError, Outcome, RequestConfig, Save, Transport,
};
use crate::model::User;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

const OK: u16 = 200;
const UNAUTHORIZED: u16 = 401;
const FORBIDDEN: u16 = 403;

/// Channel capacity used by [`Authenticator::spawn`].
pub const DEFAULT_BUFFER: usize = 8;

#[derive(Debug)]
enum AuthCommand {
    Authenticate { generation: u64 },
}

/// Next move within a pass.
enum Step {
    Ping,
    Refresh,
    Restart(u64),
    Done(AuthPhase),
}

/// Server half of an [`Authenticator`].
pub struct AuthenticatorActor {
    receiver: mpsc::Receiver<AuthCommand>,
    ping: Find<User>,
    refresh: Save<Value, Value>,
    config: RequestConfig,
    state: watch::Sender<AuthState>,
    completed: u64,
}

impl AuthenticatorActor {
    pub fn new(
        buffer_size: usize,
        ping: Find<User>,
        refresh: Save<Value, Value>,
        config: RequestConfig,
    ) -> (Self, Authenticator) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (state, observer) = watch::channel(AuthState::default());
        let actor = Self {
            receiver,
            ping,
            refresh,
            config,
            state,
            completed: 0,
        };
        let handle = Authenticator {
            sender,
            state: observer,
            requested: Arc::new(AtomicU64::new(0)),
        };
        (actor, handle)
    }

    pub async fn run(mut self) {
        info!("Authenticator started");

        while let Some(AuthCommand::Authenticate { generation }) = self.receiver.recv().await {
            let generation = self.latest_pending(generation).unwrap_or(generation);
            if generation <= self.completed {
                debug!(generation, completed = self.completed, "Already answered");
                continue;
            }
            self.authenticate(generation).await;
        }

        info!("Shutdown");
    }

    #[instrument(skip(self))]
    async fn authenticate(&mut self, mut generation: u64) {
        let mut renewed = false;
        let mut step = Step::Ping;
        loop {
            step = match step {
                Step::Ping => {
                    self.publish(generation, AuthPhase::Pinging);
                    match self.ping().await {
                        Ok(outcome) => match self.latest_pending(generation) {
                            Some(latest) => Step::Restart(latest),
                            None => on_ping(outcome, &mut renewed),
                        },
                        Err(phase) => Step::Done(phase),
                    }
                }
                Step::Refresh => {
                    self.publish(generation, AuthPhase::Refreshing);
                    match self.refresh().await {
                        Ok(outcome) => match self.latest_pending(generation) {
                            Some(latest) => Step::Restart(latest),
                            None => on_refresh(outcome),
                        },
                        Err(phase) => Step::Done(phase),
                    }
                }
                Step::Restart(latest) => {
                    debug!(from = generation, to = latest, "Superseded, restarting pass");
                    generation = latest;
                    renewed = false;
                    Step::Ping
                }
                Step::Done(phase) => {
                    self.completed = generation;
                    self.publish(generation, phase);
                    return;
                }
            };
        }
    }

    /// Pings and maps a 2xx other than 200 to a failure.
    async fn ping(&mut self) -> Result<Result<User, ApiError>, AuthPhase> {
        match self.ping_once().await {
            Ok(Ok(response)) if response.status == OK => Ok(Ok(response.data)),
            Ok(Ok(response)) => Ok(Err(ApiError::Status {
                status: response.status,
                payload: Value::Null,
            })),
            Ok(Err(error)) => Ok(Err(error)),
            Err(e) => {
                warn!(error = %e, "Ping operation unavailable");
                Err(AuthPhase::Failed(AuthFailure::Other))
            }
        }
    }

    async fn ping_once(&mut self) -> Result<Outcome<User>, OperationError> {
        self.ping.find(Some(self.config.clone()), None).await?;
        self.ping.settled().await
    }

    async fn refresh(&mut self) -> Result<Result<u16, ApiError>, AuthPhase> {
        match self.refresh_once().await {
            Ok(Ok(response)) => Ok(Ok(response.status)),
            Ok(Err(error)) => Ok(Err(error)),
            Err(e) => {
                warn!(error = %e, "Refresh operation unavailable");
                Err(AuthPhase::Failed(AuthFailure::Other))
            }
        }
    }

    async fn refresh_once(&mut self) -> Result<Outcome<Value>, OperationError> {
        self.refresh
            .save(&json!({}), Some(self.config.clone()), None)
            .await?;
        self.refresh.settled().await
    }

    /// Drains queued commands and returns the newest generation among them, if it is newer than
    /// `current`. Commands may arrive out of generation order.
    fn latest_pending(&mut self, current: u64) -> Option<u64> {
        let mut latest = None;
        while let Ok(AuthCommand::Authenticate { generation }) = self.receiver.try_recv() {
            latest = latest.max(Some(generation));
        }
        latest.filter(|g| *g > current)
    }

    fn publish(&self, generation: u64, phase: AuthPhase) {
        match &phase {
            AuthPhase::Authenticated(user) => {
                info!(generation, user_id = user.user_id, "Authenticated")
            }
            AuthPhase::Failed(reason) => info!(generation, ?reason, "Authentication failed"),
            other => debug!(generation, phase = other.name(), "Phase"),
        }
        self.state.send_replace(AuthState { generation, phase });
    }
}

fn on_ping(outcome: Result<User, ApiError>, renewed: &mut bool) -> Step {
    match outcome {
        Ok(user) => Step::Done(AuthPhase::Authenticated(user)),
        Err(error) => match error.status() {
            Some(UNAUTHORIZED) if !*renewed => {
                *renewed = true;
                Step::Refresh
            }
            Some(UNAUTHORIZED) => Step::Done(AuthPhase::Failed(AuthFailure::Unauthorized)),
            Some(FORBIDDEN) => Step::Done(AuthPhase::Failed(AuthFailure::Forbidden)),
            _ => {
                warn!(error = %error, "Ping failed");
                Step::Done(AuthPhase::Failed(AuthFailure::Other))
            }
        },
    }
}

fn on_refresh(outcome: Result<u16, ApiError>) -> Step {
    match outcome {
        Ok(OK) => Step::Ping,
        Ok(status) => {
            warn!(status, "Unexpected refresh status");
            Step::Done(AuthPhase::Failed(AuthFailure::Other))
        }
        Err(error) => match error.status() {
            Some(UNAUTHORIZED) => Step::Done(AuthPhase::Failed(AuthFailure::Unauthorized)),
            Some(FORBIDDEN) => Step::Done(AuthPhase::Failed(AuthFailure::Forbidden)),
            _ => {
                warn!(error = %error, "Refresh failed");
                Step::Done(AuthPhase::Failed(AuthFailure::Other))
            }
        },
    }
}

/// Client handle for a session authenticator.
///
/// Cheap to clone; clones share the same actor and observe the same state.
///
/// # Example
///
/// ```rust,ignore
/// let auth = root.authenticator();
/// match auth.authenticate_and_wait().await? {
///     AuthPhase::Authenticated(user) => session.set_user(Some(user)),
///     _ => session.set_user(None),
/// }
/// ```
#[derive(Clone)]
pub struct Authenticator {
    sender: mpsc::Sender<AuthCommand>,
    state: watch::Receiver<AuthState>,
    requested: Arc<AtomicU64>,
}

impl Authenticator {
    /// Spawns an authenticator pinging `ping_url` and renewing through `refresh_url`.
    pub fn spawn(
        ping_url: impl Into<String>,
        refresh_url: impl Into<String>,
        config: RequestConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let ping = Find::spawn(ping_url, Arc::clone(&transport));
        let refresh = Save::spawn(refresh_url, transport);
        let (actor, handle) = AuthenticatorActor::new(DEFAULT_BUFFER, ping, refresh, config);
        tokio::spawn(actor.run());
        handle
    }

    /// Starts a new authentication pass and returns its generation.
    ///
    /// Calling again while a pass is running supersedes it: the running pass is restarted from a
    /// fresh ping and only the newest call's outcome is reported.
    ///
    /// The generation is only taken once a channel slot is reserved, so a call cancelled while
    /// waiting for capacity leaves no unanswerable request behind.
    pub async fn authenticate(&self) -> Result<u64, AuthError> {
        let permit = self.sender.reserve().await.map_err(|_| AuthError::Closed)?;
        let generation = self.requested.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "Authenticate");
        permit.send(AuthCommand::Authenticate { generation });
        Ok(generation)
    }

    /// Waits for the terminal outcome of the most recent `authenticate()` call.
    /// Returns `Idle` at once if `authenticate()` was never called.
    pub async fn outcome(&self) -> Result<AuthPhase, AuthError> {
        let target = self.requested.load(Ordering::SeqCst);
        if target == 0 {
            return Ok(AuthPhase::Idle);
        }
        let mut observer = self.state.clone();
        let state = observer
            .wait_for(|s| s.generation >= target && s.phase.is_terminal())
            .await
            .map_err(|_| AuthError::Dropped)?;
        Ok(state.phase.clone())
    }

    pub async fn authenticate_and_wait(&self) -> Result<AuthPhase, AuthError> {
        self.authenticate().await?;
        self.outcome().await
    }

    /// Current phase as seen by callers. A requested pass that has not started yet reads as
    /// `Pinging`.
    pub fn phase(&self) -> AuthPhase {
        let state = self.state.borrow();
        if state.generation < self.requested.load(Ordering::SeqCst) && !state.phase.is_loading() {
            AuthPhase::Pinging
        } else {
            state.phase.clone()
        }
    }

    pub fn loading(&self) -> bool {
        self.phase().is_loading()
    }

    pub fn authenticated(&self) -> bool {
        matches!(self.phase(), AuthPhase::Authenticated(_))
    }

    pub fn user(&self) -> Option<User> {
        self.phase().user().cloned()
    }

    pub fn failure_reason(&self) -> Option<AuthFailure> {
        self.phase().failure()
    }

    /// Raw published state, including its generation.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::Method;
    use crate::model::UserRole;
    use std::time::Duration;

    const PING: &str = "http://api.test/auth/ping";
    const REFRESH: &str = "http://api.test/auth/refresh_access_token";

    fn spawn(mock: &MockTransport) -> Authenticator {
        Authenticator::spawn(PING, REFRESH, RequestConfig::default(), mock.shared())
    }

    #[tokio::test]
    async fn idle_before_first_call() {
        let mock = MockTransport::new();
        let auth = spawn(&mock);

        assert_eq!(auth.phase(), AuthPhase::Idle);
        assert!(!auth.loading());
        assert_eq!(auth.outcome().await.unwrap(), AuthPhase::Idle);
        mock.verify();
    }

    #[tokio::test]
    async fn reads_as_loading_until_outcome() {
        let mock = MockTransport::new();
        mock.expect(Method::Get, PING)
            .delay(Duration::from_millis(50))
            .respond(200, json!({"userId": 4, "roles": ["User"]}));
        let auth = spawn(&mock);

        auth.authenticate().await.unwrap();
        assert!(auth.loading());
        assert_eq!(auth.user(), None);

        let phase = auth.outcome().await.unwrap();
        assert_eq!(phase, AuthPhase::Authenticated(User::new(4, &[UserRole::User])));
        assert!(!auth.loading());
        assert!(auth.authenticated());
    }

    #[tokio::test]
    async fn non_200_success_is_other() {
        let mock = MockTransport::new();
        mock.expect(Method::Get, PING).respond(204, Value::Null);
        let auth = spawn(&mock);

        let phase = auth.authenticate_and_wait().await.unwrap();
        assert_eq!(phase, AuthPhase::Failed(AuthFailure::Other));
        assert_eq!(mock.calls_to(Method::Post, REFRESH), 0);
    }

    #[tokio::test]
    async fn second_unauthorized_ping_is_terminal() {
        let mock = MockTransport::new();
        mock.expect(Method::Get, PING).respond(401, Value::Null);
        mock.expect(Method::Post, REFRESH).respond(200, Value::Null);
        mock.expect(Method::Get, PING).respond(401, Value::Null);
        let auth = spawn(&mock);

        let phase = auth.authenticate_and_wait().await.unwrap();
        assert_eq!(phase, AuthPhase::Failed(AuthFailure::Unauthorized));
        assert_eq!(mock.calls_to(Method::Post, REFRESH), 1);
        assert_eq!(mock.calls_to(Method::Get, PING), 2);
        mock.verify();
    }

    /// An older generation delivered behind a newer one must not restart the pass.
    #[tokio::test]
    async fn stale_generation_does_not_restart() {
        let mock = MockTransport::new();
        mock.expect(Method::Get, PING)
            .delay(Duration::from_millis(50))
            .respond(200, json!({"userId": 6, "roles": ["User"]}));

        let ping = Find::spawn(PING, mock.shared());
        let refresh = Save::spawn(REFRESH, mock.shared());
        let (actor, auth) =
            AuthenticatorActor::new(DEFAULT_BUFFER, ping, refresh, RequestConfig::default());
        auth.requested.store(2, Ordering::SeqCst);
        auth.sender
            .send(AuthCommand::Authenticate { generation: 2 })
            .await
            .unwrap();
        tokio::spawn(actor.run());

        tokio::time::sleep(Duration::from_millis(10)).await;
        auth.sender
            .send(AuthCommand::Authenticate { generation: 1 })
            .await
            .unwrap();

        let phase = auth.outcome().await.unwrap();
        assert_eq!(phase.user().map(|u| u.user_id), Some(6));
        assert_eq!(auth.subscribe().borrow().generation, 2);
        assert_eq!(mock.calls_to(Method::Get, PING), 1);
        mock.verify();
    }
}
