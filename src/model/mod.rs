//! Wire-level data shared by the session layer and the screens built on it.
//!
//! Only identity and the validation-failure contract live here. Domain entities (movies,
//! directors, ratings) stay opaque to this crate and are decoded by callers into their own types.

pub mod requests;
pub mod user;
pub mod validation;

pub use requests::{Credentials, Registration};
pub use user::{User, UserRole};
pub use validation::{CredentialsField, FieldErrors, FormField, ValidationFailure};
