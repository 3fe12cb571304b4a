//! Generic resource-operation framework.
//!
//! An operation binds one HTTP verb to one URL template and keeps the outcome of its calls in a
//! response slot and an error slot. Each operation is a small actor: the handle sends messages,
//! the actor owns the slots.
//!
//! # Main Components
//!
//! - [`OperationActor`] - owns the slots, runs calls, applies settlements in completion order
//! - [`ResourceOperation`] - cloneable handle to the actor
//! - [`Find`], [`Save`], [`Update`], [`Remove`] - verb wrappers, read side via [`OperationClient`]
//! - [`Transport`] / [`HttpTransport`] - the network seam
//! - [`ApiError`], [`OperationError`] - call failures vs handle failures
//!
//! # Testing
//!
//! See the [`mock`] module for a scripted transport.

pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod mock;
pub mod state;
pub mod transport;
pub mod verbs;

pub use actor::OperationActor;
pub use client::ResourceOperation;
pub use error::{ApiError, OperationError};
pub use message::{OperationRequest, Response};
pub use state::{ApiResponse, OperationSnapshot, OperationState, Outcome, ResponseBody, Slot};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, RequestConfig, Transport};
pub use verbs::{Find, OperationClient, Remove, Save, Update};
