//! Session authentication: the ping/refresh protocol ([`Authenticator`]) and the access decision
//! a protected screen makes on top of it ([`guard`]).

pub mod authenticator;
pub mod error;
pub mod gatekeeper;
pub mod state;

pub use authenticator::{Authenticator, AuthenticatorActor, DEFAULT_BUFFER};
pub use error::AuthError;
pub use gatekeeper::{guard, AccessDecision, Denial};
pub use state::{AuthFailure, AuthPhase, AuthState};
