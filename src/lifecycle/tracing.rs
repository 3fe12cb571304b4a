//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing` subscriber filtered by `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Operations**: start and shutdown of each operation actor, every trigger (`ticket`, `method`,
//!   resolved `url`) and every settlement (`status` or error). Fields carry the URL template as
//!   `operation`, so overlapping calls on one operation can be told apart by `ticket`.
//! - **Authentication**: each phase change tagged with its `generation`, terminal outcomes at
//!   `info`, superseded passes at `debug`.
//! - **Session**: identity changes and notifications.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Settlements and auth outcomes only
//! RUST_LOG=info cargo run
//!
//! # Every trigger, phase change and raw response
//! RUST_LOG=debug cargo run
//!
//! # Just the authenticator
//! RUST_LOG=review_client::auth=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` a renewed session reads like:
//!
//! ```text
//! DEBUG authenticate: Phase generation=1 phase="pinging"
//! WARN  Settled with error operation="https://host/api/auth/ping" ticket=1 error=Request failed with status 401
//! DEBUG authenticate: Phase generation=1 phase="refreshing"
//! INFO  Settled operation="https://host/api/auth/refresh_access_token" ticket=1 status=200
//! DEBUG authenticate: Phase generation=1 phase="pinging"
//! INFO  Settled operation="https://host/api/auth/ping" ticket=2 status=200
//! INFO  authenticate: Authenticated generation=1 user_id=7
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // operation and generation fields identify the source
        .compact()
        .init();
}
