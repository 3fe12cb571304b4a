//! Application wiring: the [`ApplicationRoot`] that owns configuration, transport and session,
//! and the tracing setup.

pub mod application;
pub mod tracing;

pub use application::ApplicationRoot;
pub use self::tracing::setup_tracing;
