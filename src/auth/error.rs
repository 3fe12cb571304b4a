//! Error types for the authenticator handle.

use thiserror::Error;

/// Failures of the handle itself. Authentication outcomes are reported as
/// [`AuthPhase`](crate::auth::AuthPhase), never as errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    /// The authenticator task is no longer accepting commands.
    #[error("Authenticator closed")]
    Closed,

    /// The authenticator stopped before publishing an outcome.
    #[error("Authenticator dropped before reporting an outcome")]
    Dropped,
}
