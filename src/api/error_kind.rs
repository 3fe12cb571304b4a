//! Classification of failed calls.
//!
//! Operations store failures untouched. Screens that need to react to *why* a call failed run the
//! stored [`ApiError`] through [`ErrorKind::classify`].

use crate::framework::ApiError;
use crate::model::ValidationFailure;

pub const UNAUTHORIZED: u16 = 401;
pub const FORBIDDEN: u16 = 403;
pub const NOT_FOUND: u16 = 404;
pub const UNPROCESSABLE_ENTITY: u16 = 422;

/// What a failed call means to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    /// Field-level validation failures, in the order the server sent them.
    Unprocessable(Vec<ValidationFailure>),
    /// Network failure, 5xx, malformed body, or any other status.
    Other,
}

impl ErrorKind {
    pub fn classify(error: &ApiError) -> Self {
        match error {
            ApiError::Status { status, payload } => match *status {
                UNAUTHORIZED => ErrorKind::Unauthorized,
                FORBIDDEN => ErrorKind::Forbidden,
                NOT_FOUND => ErrorKind::NotFound,
                UNPROCESSABLE_ENTITY => serde_json::from_value(payload.clone())
                    .map(ErrorKind::Unprocessable)
                    .unwrap_or(ErrorKind::Other),
                _ => ErrorKind::Other,
            },
            ApiError::Transport(_) | ApiError::Decode { .. } => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn status(status: u16, payload: Value) -> ApiError {
        ApiError::Status { status, payload }
    }

    #[test]
    fn maps_statuses_onto_kinds() {
        assert_eq!(ErrorKind::classify(&status(401, Value::Null)), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::classify(&status(403, Value::Null)), ErrorKind::Forbidden);
        assert_eq!(
            ErrorKind::classify(&status(404, json!("Movie not found."))),
            ErrorKind::NotFound
        );
        assert_eq!(ErrorKind::classify(&status(500, Value::Null)), ErrorKind::Other);
        assert_eq!(
            ErrorKind::classify(&ApiError::Transport("connection refused".into())),
            ErrorKind::Other
        );
        assert_eq!(
            ErrorKind::classify(&ApiError::Decode {
                status: 200,
                message: "missing field".into()
            }),
            ErrorKind::Other
        );
    }

    #[test]
    fn unprocessable_keeps_failure_order() {
        let payload = json!([
            {"propertyName": "Username", "value": "Username is taken."},
            {"propertyName": "Password", "value": "Too short."}
        ]);
        assert_eq!(
            ErrorKind::classify(&status(422, payload)),
            ErrorKind::Unprocessable(vec![
                ValidationFailure::new("Username", "Username is taken."),
                ValidationFailure::new("Password", "Too short."),
            ])
        );
    }

    #[test]
    fn unprocessable_with_unreadable_payload_is_other() {
        assert_eq!(
            ErrorKind::classify(&status(422, json!("bad input"))),
            ErrorKind::Other
        );
    }
}
