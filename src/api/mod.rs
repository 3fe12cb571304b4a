//! Everything that sits between the raw operation engine and the screens: where the API lives
//! ([`ApiData`]), which paths it serves ([`routes`]), and what a failed call means
//! ([`ErrorKind`]).

pub mod config;
pub mod error_kind;
pub mod routes;

pub use config::{ApiData, ConfigError};
pub use error_kind::ErrorKind;
pub use routes::{Collection, Route, SubCollection};
