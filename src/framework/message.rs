//! # Operation Messages
//!
//! Everything a [`ResourceOperation`](crate::framework::ResourceOperation) handle asks of its
//! [`OperationActor`](crate::framework::OperationActor) travels as an [`OperationRequest`]. Reads
//! carry a oneshot responder; fire-and-forget writes (`Trigger`) do not.

use crate::framework::error::ApiError;
use crate::framework::state::{ApiResponse, OperationSnapshot, Outcome};
use crate::framework::transport::{Method, RequestConfig};
use crate::url_template::UrlParam;
use serde_json::Value;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<T>;

/// Requests understood by an operation actor.
///
/// - **Trigger**: start a call. Never waits for it to settle.
/// - **Snapshot**: copy the slots and the in-flight flag.
/// - **Take\***: read-and-clear one slot in a single step.
/// - **Clear\***: empty one slot. Idempotent.
/// - **Settled**: wait for the next outcome and consume it.
#[derive(Debug)]
pub enum OperationRequest<R> {
    Trigger {
        method: Method,
        body: Option<Value>,
        config: RequestConfig,
        url_params: Option<Vec<UrlParam>>,
    },
    Snapshot {
        respond_to: Response<OperationSnapshot<R>>,
    },
    TakeResponse {
        respond_to: Response<Option<ApiResponse<R>>>,
    },
    TakeError {
        respond_to: Response<Option<ApiError>>,
    },
    ClearResponse {
        respond_to: Response<()>,
    },
    ClearError {
        respond_to: Response<()>,
    },
    Settled {
        respond_to: Response<Outcome<R>>,
    },
}
