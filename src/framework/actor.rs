//! # Operation Actor
//!
//! The server half of a resource operation. It owns the response and error slots and is the only
//! place they are written, so no locks are needed: every trigger, read and settlement is handled
//! one at a time by [`OperationActor::run`].
//!
//! Calls themselves run as separate tasks in a [`JoinSet`]. The actor does not wait for a call
//! before accepting the next trigger, and settlements are applied in the order the calls
//! *complete*. Overlapping triggers are neither queued nor cancelled, so whichever call finishes
//! last owns the slots.

use crate::framework::client::ResourceOperation;
use crate::framework::error::ApiError;
use crate::framework::message::{OperationRequest, Response};
use crate::framework::state::{ApiResponse, OperationSnapshot, Outcome, ResponseBody, Slot};
use crate::framework::transport::{HttpRequest, Transport};
use crate::url_template::{has_placeholders, resolve};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// A finished call, tagged with the trigger that started it.
struct Settlement<R> {
    ticket: u64,
    outcome: Outcome<R>,
}

/// Actor behind a [`ResourceOperation`].
///
/// # Usage Pattern
///
/// 1. **Create**: `OperationActor::new()` returns the actor and its handle.
/// 2. **Run**: spawn `actor.run()` on the runtime.
/// 3. **Use**: trigger and read through the handle. Dropping every handle stops the actor and
///    aborts calls still in flight.
///
/// [`ResourceOperation::spawn`] does steps 1 and 2 in one go.
pub struct OperationActor<R: ResponseBody> {
    receiver: mpsc::Receiver<OperationRequest<R>>,
    url_template: String,
    transport: Arc<dyn Transport>,
    calls: JoinSet<Settlement<R>>,
    next_ticket: u64,
    response: Option<ApiResponse<R>>,
    error: Option<ApiError>,
    latest: Option<Slot>,
    waiters: VecDeque<Response<Outcome<R>>>,
}

impl<R: ResponseBody> OperationActor<R> {
    /// Creates the actor and its handle.
    ///
    /// * `buffer_size` - capacity of the request channel; handles wait when it is full.
    /// * `url_template` - absolute URL, possibly with `{name}` placeholders.
    pub fn new(
        buffer_size: usize,
        url_template: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> (Self, ResourceOperation<R>) {
        let url_template = url_template.into();
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            url_template: url_template.clone(),
            transport,
            calls: JoinSet::new(),
            next_ticket: 0,
            response: None,
            error: None,
            latest: None,
            waiters: VecDeque::new(),
        };
        (actor, ResourceOperation::new(sender, url_template))
    }

    /// Processes requests and settlements until every handle is dropped.
    pub async fn run(mut self) {
        info!(operation = %self.url_template, "Operation started");

        loop {
            tokio::select! {
                request = self.receiver.recv() => match request {
                    Some(request) => self.handle(request),
                    None => break,
                },
                Some(joined) = self.calls.join_next() => match joined {
                    Ok(settlement) => self.settle(settlement),
                    Err(e) => warn!(operation = %self.url_template, error = %e, "Call task failed"),
                },
            }
        }

        info!(
            operation = %self.url_template,
            aborted = self.calls.len(),
            "Shutdown"
        );
    }

    fn handle(&mut self, request: OperationRequest<R>) {
        match request {
            OperationRequest::Trigger {
                method,
                body,
                config,
                url_params,
            } => {
                let url = match &url_params {
                    Some(params) => resolve(&self.url_template, params),
                    None => self.url_template.clone(),
                };
                if has_placeholders(&url) {
                    warn!(operation = %self.url_template, %url, "Unresolved placeholders");
                }

                self.next_ticket += 1;
                let ticket = self.next_ticket;
                debug!(operation = %self.url_template, ticket, %method, %url, "Trigger");

                let request = HttpRequest {
                    method,
                    url,
                    body,
                    config,
                };
                let transport = Arc::clone(&self.transport);
                self.calls.spawn(async move {
                    let outcome = dispatch::<R>(transport.as_ref(), request).await;
                    Settlement { ticket, outcome }
                });
            }
            OperationRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(OperationSnapshot {
                    loading: !self.calls.is_empty(),
                    response: self.response.clone(),
                    error: self.error.clone(),
                    latest: self.latest,
                });
            }
            OperationRequest::TakeResponse { respond_to } => {
                let response = self.response.take();
                self.refresh_latest();
                if let Err(Some(response)) = respond_to.send(response) {
                    self.store(Ok(response));
                }
            }
            OperationRequest::TakeError { respond_to } => {
                let error = self.error.take();
                self.refresh_latest();
                if let Err(Some(error)) = respond_to.send(error) {
                    self.store(Err(error));
                }
            }
            OperationRequest::ClearResponse { respond_to } => {
                self.response = None;
                self.refresh_latest();
                let _ = respond_to.send(());
            }
            OperationRequest::ClearError { respond_to } => {
                self.error = None;
                self.refresh_latest();
                let _ = respond_to.send(());
            }
            OperationRequest::Settled { respond_to } => match self.take_latest() {
                Some(outcome) => {
                    if let Err(outcome) = respond_to.send(outcome) {
                        self.store(outcome);
                    }
                }
                None => self.waiters.push_back(respond_to),
            },
        }
    }

    /// Hands the outcome to the oldest live `settled()` waiter, or parks it in its slot.
    fn settle(&mut self, Settlement { ticket, outcome }: Settlement<R>) {
        match &outcome {
            Ok(response) => {
                info!(operation = %self.url_template, ticket, status = response.status, "Settled")
            }
            Err(error) => {
                warn!(operation = %self.url_template, ticket, error = %error, "Settled with error")
            }
        }

        let mut outcome = outcome;
        while let Some(waiter) = self.waiters.pop_front() {
            match waiter.send(outcome) {
                Ok(()) => return,
                Err(returned) => {
                    debug!(operation = %self.url_template, ticket, "Waiter dropped");
                    outcome = returned;
                }
            }
        }
        self.store(outcome);
    }

    /// Writes one slot, replacing any unconsumed value in it. The other slot is left alone.
    fn store(&mut self, outcome: Outcome<R>) {
        match outcome {
            Ok(response) => {
                self.response = Some(response);
                self.latest = Some(Slot::Response);
            }
            Err(error) => {
                self.error = Some(error);
                self.latest = Some(Slot::Error);
            }
        }
    }

    fn take_latest(&mut self) -> Option<Outcome<R>> {
        let outcome = if self.latest == Some(Slot::Error) {
            self.error
                .take()
                .map(Err)
                .or_else(|| self.response.take().map(Ok))
        } else {
            self.response
                .take()
                .map(Ok)
                .or_else(|| self.error.take().map(Err))
        };
        self.refresh_latest();
        outcome
    }

    fn refresh_latest(&mut self) {
        self.latest = match (self.latest, self.response.is_some(), self.error.is_some()) {
            (Some(Slot::Response), true, _) => Some(Slot::Response),
            (Some(Slot::Error), _, true) => Some(Slot::Error),
            (_, true, false) => Some(Slot::Response),
            (_, false, true) => Some(Slot::Error),
            (latest, true, true) => latest,
            (_, false, false) => None,
        };
    }
}

/// Sends one request and turns the answer into an outcome: non-2xx statuses and bodies that do
/// not decode into `R` become errors.
async fn dispatch<R: ResponseBody>(transport: &dyn Transport, request: HttpRequest) -> Outcome<R> {
    let response = transport.send(request).await?;
    let status = response.status;
    if !response.is_success() {
        return Err(ApiError::Status {
            status,
            payload: response.body,
        });
    }
    let data = serde_json::from_value(response.body).map_err(|e| ApiError::Decode {
        status,
        message: e.to_string(),
    })?;
    Ok(ApiResponse { status, data })
}
