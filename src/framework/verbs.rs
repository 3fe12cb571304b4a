//! # Find / Save / Update / Remove
//!
//! Verb-specific wrappers over the generic [`ResourceOperation`]. Each one fixes the HTTP method
//! and the shape of its trigger; the read side (slots, `settled()`) is shared through the
//! [`OperationClient`] trait.
//!
//! | Wrapper  | Trigger                               | Method |
//! |----------|---------------------------------------|--------|
//! | `Find`   | `find(config, url_params)`            | GET    |
//! | `Save`   | `save(&body, config, url_params)`     | POST   |
//! | `Update` | `update(&body, config, url_params)`   | PUT    |
//! | `Remove` | `remove(config, url_params)`          | DELETE |

use crate::framework::client::ResourceOperation;
use crate::framework::error::{ApiError, OperationError};
use crate::framework::state::{ApiResponse, OperationSnapshot, Outcome, ResponseBody};
use crate::framework::transport::{Method, RequestConfig, Transport};
use crate::url_template::UrlParam;
use async_trait::async_trait;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Read-side operations every verb wrapper inherits from its inner [`ResourceOperation`].
#[async_trait]
pub trait OperationClient<R: ResponseBody>: Send + Sync {
    /// Access the inner generic operation.
    fn inner(&self) -> &ResourceOperation<R>;

    async fn snapshot(&self) -> Result<OperationSnapshot<R>, OperationError> {
        self.inner().snapshot().await
    }

    async fn loading(&self) -> Result<bool, OperationError> {
        self.inner().loading().await
    }

    async fn response(&self) -> Result<Option<ApiResponse<R>>, OperationError> {
        self.inner().response().await
    }

    async fn error(&self) -> Result<Option<ApiError>, OperationError> {
        self.inner().error().await
    }

    async fn take_response(&self) -> Result<Option<ApiResponse<R>>, OperationError> {
        self.inner().take_response().await
    }

    async fn take_error(&self) -> Result<Option<ApiError>, OperationError> {
        self.inner().take_error().await
    }

    async fn clear_response(&self) -> Result<(), OperationError> {
        self.inner().clear_response().await
    }

    async fn clear_error(&self) -> Result<(), OperationError> {
        self.inner().clear_error().await
    }

    async fn settled(&self) -> Result<Outcome<R>, OperationError> {
        self.inner().settled().await
    }
}

fn encode<Q: Serialize>(body: &Q) -> Result<serde_json::Value, OperationError> {
    serde_json::to_value(body).map_err(|e| OperationError::Encode(e.to_string()))
}

/// GET operation.
pub struct Find<R> {
    inner: ResourceOperation<R>,
}

impl<R> Clone for Find<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R: ResponseBody> Find<R> {
    pub fn new(inner: ResourceOperation<R>) -> Self {
        Self { inner }
    }

    pub fn spawn(url_template: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self::new(ResourceOperation::spawn(url_template, transport))
    }

    #[instrument(skip(self), fields(operation = %self.inner.url_template()))]
    pub async fn find(
        &self,
        config: Option<RequestConfig>,
        url_params: Option<&[UrlParam]>,
    ) -> Result<(), OperationError> {
        debug!("Sending request");
        self.inner
            .trigger(Method::Get, None, config, url_params)
            .await
    }
}

impl<R: ResponseBody> OperationClient<R> for Find<R> {
    fn inner(&self) -> &ResourceOperation<R> {
        &self.inner
    }
}

/// POST operation taking a `Q` body.
pub struct Save<Q, R> {
    inner: ResourceOperation<R>,
    _request: PhantomData<fn(&Q)>,
}

impl<Q, R> Clone for Save<Q, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _request: PhantomData,
        }
    }
}

impl<Q: Serialize, R: ResponseBody> Save<Q, R> {
    pub fn new(inner: ResourceOperation<R>) -> Self {
        Self {
            inner,
            _request: PhantomData,
        }
    }

    pub fn spawn(url_template: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self::new(ResourceOperation::spawn(url_template, transport))
    }

    #[instrument(skip(self, body), fields(operation = %self.inner.url_template()))]
    pub async fn save(
        &self,
        body: &Q,
        config: Option<RequestConfig>,
        url_params: Option<&[UrlParam]>,
    ) -> Result<(), OperationError> {
        debug!("Sending request");
        let body = encode(body)?;
        self.inner
            .trigger(Method::Post, Some(body), config, url_params)
            .await
    }
}

impl<Q, R: ResponseBody> OperationClient<R> for Save<Q, R> {
    fn inner(&self) -> &ResourceOperation<R> {
        &self.inner
    }
}

/// PUT operation taking a `Q` body (full replace).
pub struct Update<Q, R> {
    inner: ResourceOperation<R>,
    _request: PhantomData<fn(&Q)>,
}

impl<Q, R> Clone for Update<Q, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _request: PhantomData,
        }
    }
}

impl<Q: Serialize, R: ResponseBody> Update<Q, R> {
    pub fn new(inner: ResourceOperation<R>) -> Self {
        Self {
            inner,
            _request: PhantomData,
        }
    }

    pub fn spawn(url_template: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self::new(ResourceOperation::spawn(url_template, transport))
    }

    #[instrument(skip(self, body), fields(operation = %self.inner.url_template()))]
    pub async fn update(
        &self,
        body: &Q,
        config: Option<RequestConfig>,
        url_params: Option<&[UrlParam]>,
    ) -> Result<(), OperationError> {
        debug!("Sending request");
        let body = encode(body)?;
        self.inner
            .trigger(Method::Put, Some(body), config, url_params)
            .await
    }
}

impl<Q, R: ResponseBody> OperationClient<R> for Update<Q, R> {
    fn inner(&self) -> &ResourceOperation<R> {
        &self.inner
    }
}

/// DELETE operation. The default `()` body matches the empty 204 answer.
pub struct Remove<R = ()> {
    inner: ResourceOperation<R>,
}

impl<R> Clone for Remove<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R: ResponseBody> Remove<R> {
    pub fn new(inner: ResourceOperation<R>) -> Self {
        Self { inner }
    }

    pub fn spawn(url_template: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self::new(ResourceOperation::spawn(url_template, transport))
    }

    #[instrument(skip(self), fields(operation = %self.inner.url_template()))]
    pub async fn remove(
        &self,
        config: Option<RequestConfig>,
        url_params: Option<&[UrlParam]>,
    ) -> Result<(), OperationError> {
        debug!("Sending request");
        self.inner
            .trigger(Method::Delete, None, config, url_params)
            .await
    }
}

impl<R: ResponseBody> OperationClient<R> for Remove<R> {
    fn inner(&self) -> &ResourceOperation<R> {
        &self.inner
    }
}
