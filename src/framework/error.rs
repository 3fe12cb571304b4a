//! # Framework Errors
//!
//! Two layers of failure live here:
//!
//! - [`ApiError`] is the *outcome* of a call. It is what an operation writes into its error slot
//!   and it is never interpreted by the operation itself; status classification happens one layer
//!   up (see [`crate::api::ErrorKind`]).
//! - [`OperationError`] is a failure of the operation *handle*: the actor behind it is gone, or the
//!   request body could not be encoded. These never enter the slots.

use serde_json::Value;

/// Failure of a single network call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, TLS, ...).
    #[error("Transport failure: {0}")]
    Transport(String),
    /// The server answered with a non-2xx status. `payload` carries the body as sent.
    #[error("Request failed with status {status}")]
    Status { status: u16, payload: Value },
    /// A 2xx response whose body did not match the expected shape.
    #[error("Malformed response body (status {status}): {message}")]
    Decode { status: u16, message: String },
}

impl ApiError {
    /// The HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport(_) => None,
            ApiError::Status { status, .. } | ApiError::Decode { status, .. } => Some(*status),
        }
    }

    /// The structured error body of a non-2xx response.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiError::Status { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

/// Errors raised by an operation handle rather than by the call it drives.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OperationError {
    #[error("Operation closed")]
    Closed,
    #[error("Operation dropped response channel")]
    Dropped,
    #[error("Request body could not be encoded: {0}")]
    Encode(String),
}
