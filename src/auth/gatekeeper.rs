//! Access decision for a protected screen.
//!
//! [`guard`] authenticates, records the outcome in the [`SharedSessionContext`], and checks the
//! required role. Callers route on the returned [`AccessDecision`].

use crate::auth::authenticator::Authenticator;
use crate::auth::error::AuthError;
use crate::auth::state::{AuthFailure, AuthPhase};
use crate::model::{User, UserRole};
use crate::session::SharedSessionContext;
use tracing::{info, instrument, warn};

/// Why access was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No valid session, even after renewal.
    Unauthorized,
    /// Session is valid but not allowed here (403 or missing role).
    Forbidden,
    /// Anything else: network failure, server error, unexpected answer.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccessDecision {
    Granted(User),
    Denied(Denial),
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted(_))
    }
}

/// Runs a fresh authentication pass and decides whether a screen requiring `required_role` may
/// be shown.
///
/// The session user is set to the authenticated identity (even when the role check then fails)
/// or cleared when authentication fails.
#[instrument(skip(authenticator, session), fields(role = %required_role))]
pub async fn guard(
    authenticator: &Authenticator,
    session: &SharedSessionContext,
    required_role: UserRole,
) -> Result<AccessDecision, AuthError> {
    let decision = match authenticator.authenticate_and_wait().await? {
        AuthPhase::Authenticated(user) => {
            session.set_user(Some(user.clone()));
            if user.has_role(required_role) {
                AccessDecision::Granted(user)
            } else {
                warn!(user_id = user.user_id, "Missing required role");
                AccessDecision::Denied(Denial::Forbidden)
            }
        }
        AuthPhase::Failed(reason) => {
            session.set_user(None);
            AccessDecision::Denied(match reason {
                AuthFailure::Unauthorized => Denial::Unauthorized,
                AuthFailure::Forbidden => Denial::Forbidden,
                AuthFailure::Other => Denial::Error,
            })
        }
        AuthPhase::Idle | AuthPhase::Pinging | AuthPhase::Refreshing => {
            session.set_user(None);
            AccessDecision::Denied(Denial::Error)
        }
    };
    info!(granted = decision.is_granted(), "Access decision");
    Ok(decision)
}
