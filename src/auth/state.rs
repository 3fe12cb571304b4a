//! Observable state of a session authenticator.

use crate::model::User;

/// Why an authentication pass ended without an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    Unauthorized,
    Forbidden,
    Other,
}

/// `Idle -> Pinging -> (Authenticated | Refreshing -> (Pinging | Failed))`.
///
/// The identity lives inside `Authenticated`, so "user present iff authenticated" holds by
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthPhase {
    Idle,
    Pinging,
    Refreshing,
    Authenticated(User),
    Failed(AuthFailure),
}

impl AuthPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthPhase::Pinging | AuthPhase::Refreshing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AuthPhase::Authenticated(_) | AuthPhase::Failed(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthPhase::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<AuthFailure> {
        match self {
            AuthPhase::Failed(reason) => Some(*reason),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AuthPhase::Idle => "idle",
            AuthPhase::Pinging => "pinging",
            AuthPhase::Refreshing => "refreshing",
            AuthPhase::Authenticated(_) => "authenticated",
            AuthPhase::Failed(_) => "failed",
        }
    }
}

/// Phase tagged with the `authenticate()` call it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub generation: u64,
    pub phase: AuthPhase,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            generation: 0,
            phase: AuthPhase::Idle,
        }
    }
}
