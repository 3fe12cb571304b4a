#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Review Client
//!
//! > **The data-access and session layer of the movie review admin client.**
//!
//! Every network interaction of the application goes through one primitive, the *resource
//! operation*: a small actor bound to one HTTP verb and one URL template that keeps the outcome of
//! its calls in a response slot and an error slot. On top of it sits the session authenticator,
//! which pings the API, renews an expired session once, and reports who the caller is.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Why actors for HTTP calls?
//!
//! Screens trigger calls and later react to whatever settled. Holding that state in an actor gives:
//! - **No locks**: slots are written by exactly one task, settlements are applied one at a time.
//! - **Completion order**: overlapping calls are neither queued nor cancelled; the last to
//!   *complete* owns the slots.
//! - **Consume-once**: `settled()` hands each outcome to exactly one waiter, and `take_*` reads and
//!   clears in a single step, so an outcome is never acted on twice.
//!
//! ## 🚀 Core Concepts
//!
//! ### Generics: one engine, four verbs
//! [`ResourceOperation<R>`](framework::ResourceOperation) is written once. [`Find`](framework::Find),
//! [`Save`](framework::Save), [`Update`](framework::Update) and [`Remove`](framework::Remove) only
//! fix the HTTP method and the trigger signature.
//!
//! ### Mocking: testing without a server
//! [`MockTransport`](framework::mock::MockTransport) scripts answers, delays and hangs per
//! method and URL. See the [`framework::mock`] module.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Outcomes vs failures
//! A 404 is not a Rust error: it is an [`ApiError`](framework::ApiError) settled into the error
//! slot. `Result` errors on handles ([`OperationError`](framework::OperationError),
//! [`AuthError`](auth::AuthError)) only mean the actor behind the handle is gone.
//!
//! ### 2. Classification one layer up
//! Operations never interpret status codes. Screens run failures through
//! [`ErrorKind::classify`](api::ErrorKind::classify); only the authenticator acts on 401/403
//! itself.
//!
//! ### 3. Observability
//! `tracing` everywhere, with `operation`, `ticket` and `generation` fields. See the
//! [`lifecycle::tracing`] module.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`], [`url_template`])
//! Operation actor and handle, verb wrappers, transport seam, mock.
//!
//! ### 2. Authentication ([`auth`])
//! The ping/refresh state machine and the protected-screen [`guard`](auth::guard).
//!
//! ### 3. Session ([`session`])
//! Current identity and transient notifications, shared by every screen.
//!
//! ### 4. Wiring ([`api`], [`model`], [`lifecycle`])
//! Base URL and routes, error classification, identity and validation types, and the
//! [`ApplicationRoot`](lifecycle::ApplicationRoot) that builds everything.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! REVIEW_API_URL=http://localhost:5000/api RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod api;
pub mod auth;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod session;
pub mod url_template;
