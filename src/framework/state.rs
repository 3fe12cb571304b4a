//! # Operation State
//!
//! Values an operation exposes to its readers: the settled [`ApiResponse`], the observable
//! [`OperationSnapshot`], and the derived [`OperationState`].

use crate::framework::error::ApiError;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// Bound for the decoded body of a successful call.
pub trait ResponseBody: DeserializeOwned + Clone + Debug + Send + Sync + 'static {}

impl<T> ResponseBody for T where T: DeserializeOwned + Clone + Debug + Send + Sync + 'static {}

/// A successful (2xx) response with its decoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<R> {
    pub status: u16,
    pub data: R,
}

/// What a call settles into.
pub type Outcome<R> = Result<ApiResponse<R>, ApiError>;

/// Which slot was written by the most recent settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Response,
    Error,
}

/// Point-in-time copy of an operation's slots.
///
/// `response` and `error` have independent histories: a success does not clear a stale error and
/// a failure does not clear a stale response. `latest` says which one the last settlement wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSnapshot<R> {
    pub loading: bool,
    pub response: Option<ApiResponse<R>>,
    pub error: Option<ApiError>,
    pub latest: Option<Slot>,
}

impl<R> Default for OperationSnapshot<R> {
    fn default() -> Self {
        Self {
            loading: false,
            response: None,
            error: None,
            latest: None,
        }
    }
}

/// `Idle | InFlight | Settled(response) | Settled(error)`.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationState<R> {
    Idle,
    InFlight,
    Succeeded(ApiResponse<R>),
    Failed(ApiError),
}

impl<R> OperationSnapshot<R> {
    /// Collapses the slots into a single state. When both slots hold a value the most recent
    /// settlement wins; when only one does, that one is reported.
    pub fn state(self) -> OperationState<R> {
        if self.loading {
            return OperationState::InFlight;
        }
        match (self.response, self.error, self.latest) {
            (Some(response), _, Some(Slot::Response)) => OperationState::Succeeded(response),
            (_, Some(error), Some(Slot::Error)) => OperationState::Failed(error),
            (Some(response), None, _) => OperationState::Succeeded(response),
            (None, Some(error), _) => OperationState::Failed(error),
            (Some(response), Some(_), None) => OperationState::Succeeded(response),
            (None, None, _) => OperationState::Idle,
        }
    }
}
