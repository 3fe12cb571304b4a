//! # Operation Handle
//!
//! [`ResourceOperation`] is the client half of an operation. It holds only a channel sender, so it
//! is cheap to clone and can be shared between tasks; every clone talks to the same slots.

use crate::framework::actor::OperationActor;
use crate::framework::error::{ApiError, OperationError};
use crate::framework::message::OperationRequest;
use crate::framework::state::{ApiResponse, OperationSnapshot, OperationState, Outcome, ResponseBody};
use crate::framework::transport::{Method, RequestConfig, Transport};
use crate::url_template::UrlParam;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Channel capacity used by [`ResourceOperation::spawn`].
pub const DEFAULT_BUFFER: usize = 32;

/// Type-safe handle to an [`OperationActor`].
///
/// The verb-specific wrappers ([`Find`](crate::framework::Find), [`Save`](crate::framework::Save),
/// [`Update`](crate::framework::Update), [`Remove`](crate::framework::Remove)) are the usual entry
/// points; this type is the shared engine underneath them.
///
/// # Consume-once
///
/// A settled outcome should be acted on once. Either read it with [`settled`](Self::settled),
/// which hands each outcome to exactly one waiter, or read it with
/// [`take_response`](Self::take_response) / [`take_error`](Self::take_error), which clear the slot
/// in the same step. [`response`](Self::response) and [`error`](Self::error) only peek; callers
/// using them must follow up with [`clear_response`](Self::clear_response) /
/// [`clear_error`](Self::clear_error).
pub struct ResourceOperation<R> {
    sender: mpsc::Sender<OperationRequest<R>>,
    url_template: Arc<str>,
}

impl<R> Clone for ResourceOperation<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            url_template: Arc::clone(&self.url_template),
        }
    }
}

impl<R: ResponseBody> ResourceOperation<R> {
    pub fn new(sender: mpsc::Sender<OperationRequest<R>>, url_template: impl Into<Arc<str>>) -> Self {
        Self {
            sender,
            url_template: url_template.into(),
        }
    }

    /// Creates the actor and runs it on the current Tokio runtime.
    pub fn spawn(url_template: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let (actor, operation) = OperationActor::new(DEFAULT_BUFFER, url_template, transport);
        tokio::spawn(actor.run());
        operation
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    /// Starts a call and returns as soon as the actor accepted it. The outcome lands in the slots
    /// (or with a `settled()` waiter) later.
    pub async fn trigger(
        &self,
        method: Method,
        body: Option<Value>,
        config: Option<RequestConfig>,
        url_params: Option<&[UrlParam]>,
    ) -> Result<(), OperationError> {
        self.sender
            .send(OperationRequest::Trigger {
                method,
                body,
                config: config.unwrap_or_default(),
                url_params: url_params.map(<[UrlParam]>::to_vec),
            })
            .await
            .map_err(|_| OperationError::Closed)
    }

    pub async fn snapshot(&self) -> Result<OperationSnapshot<R>, OperationError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(OperationRequest::Snapshot { respond_to })
            .await
            .map_err(|_| OperationError::Closed)?;
        response.await.map_err(|_| OperationError::Dropped)
    }

    pub async fn state(&self) -> Result<OperationState<R>, OperationError> {
        Ok(self.snapshot().await?.state())
    }

    /// True while at least one triggered call has not settled.
    pub async fn loading(&self) -> Result<bool, OperationError> {
        Ok(self.snapshot().await?.loading)
    }

    /// Peeks at the response slot.
    pub async fn response(&self) -> Result<Option<ApiResponse<R>>, OperationError> {
        Ok(self.snapshot().await?.response)
    }

    /// Peeks at the error slot.
    pub async fn error(&self) -> Result<Option<ApiError>, OperationError> {
        Ok(self.snapshot().await?.error)
    }

    pub async fn take_response(&self) -> Result<Option<ApiResponse<R>>, OperationError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(OperationRequest::TakeResponse { respond_to })
            .await
            .map_err(|_| OperationError::Closed)?;
        response.await.map_err(|_| OperationError::Dropped)
    }

    pub async fn take_error(&self) -> Result<Option<ApiError>, OperationError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(OperationRequest::TakeError { respond_to })
            .await
            .map_err(|_| OperationError::Closed)?;
        response.await.map_err(|_| OperationError::Dropped)
    }

    pub async fn clear_response(&self) -> Result<(), OperationError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(OperationRequest::ClearResponse { respond_to })
            .await
            .map_err(|_| OperationError::Closed)?;
        response.await.map_err(|_| OperationError::Dropped)
    }

    pub async fn clear_error(&self) -> Result<(), OperationError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(OperationRequest::ClearError { respond_to })
            .await
            .map_err(|_| OperationError::Closed)?;
        response.await.map_err(|_| OperationError::Dropped)
    }

    /// Waits for the next outcome and consumes it.
    ///
    /// If a slot already holds an unconsumed outcome, the most recent one is taken immediately.
    /// Otherwise the caller is queued and receives the next settlement instead of the slots.
    /// Concurrent waiters are served in the order they asked.
    ///
    /// Do not race this future against others with `select!`: an outcome handed over just before
    /// the future is dropped is lost.
    pub async fn settled(&self) -> Result<Outcome<R>, OperationError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(OperationRequest::Settled { respond_to })
            .await
            .map_err(|_| OperationError::Closed)?;
        response.await.map_err(|_| OperationError::Dropped)
    }
}
