//! # Shared Session Context
//!
//! Process-wide holder of the current identity plus a single-slot notification channel. The
//! application root creates one and hands clones to whatever needs it; every clone points at the
//! same state.
//!
//! ## Notifications
//!
//! [`SharedSessionContext::notify`] replaces whatever notification is showing (last write wins, no
//! queue) and schedules it to disappear after the configured time-to-live. A dismissal timer only
//! ever clears the notification it was started for, so a newer message is never cut short by an
//! older timer.
//!
//! ```rust
//! use review_client::session::{SharedSessionContext, Severity};
//!
//! #[tokio::main]
//! async fn main() {
//!     let session = SharedSessionContext::new();
//!     session.notify("Director created", Severity::Success);
//!     session.notify("Could not save rating", Severity::Error);
//!
//!     let showing = session.notification().unwrap();
//!     assert_eq!(showing.message, "Could not save rating");
//! }
//! ```

use crate::model::User;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// How long a notification stays up unless replaced or dismissed.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Success,
    Warning,
    Error,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
}

struct Inner {
    user: watch::Sender<Option<User>>,
    notification: watch::Sender<Option<Notification>>,
    next_id: AtomicU64,
    ttl: Duration,
}

/// Cheaply cloneable handle to the session state.
#[derive(Clone)]
pub struct SharedSessionContext {
    inner: Arc<Inner>,
}

impl Default for SharedSessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedSessionContext {
    pub fn new() -> Self {
        Self::with_notification_ttl(DEFAULT_NOTIFICATION_TTL)
    }

    pub fn with_notification_ttl(ttl: Duration) -> Self {
        let (user, _) = watch::channel(None);
        let (notification, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                user,
                notification,
                next_id: AtomicU64::new(0),
                ttl,
            }),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.inner.user.borrow().clone()
    }

    /// Replaces the current identity. `None` signs the session out.
    pub fn set_user(&self, user: Option<User>) {
        debug!(user_id = ?user.as_ref().map(|u| u.user_id), "Session user");
        self.inner.user.send_replace(user);
    }

    pub fn subscribe_user(&self) -> watch::Receiver<Option<User>> {
        self.inner.user.subscribe()
    }

    /// Shows `message`, replacing any notification still up. Returns the notification id.
    ///
    /// Auto-dismissal needs a Tokio runtime; outside one the notification stays until replaced or
    /// [`dismiss`](Self::dismiss)ed.
    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let message = message.into();
        info!(id, %severity, %message, "Notify");
        self.inner.notification.send_replace(Some(Notification {
            id,
            message,
            severity,
        }));

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(dismiss_after(Arc::downgrade(&self.inner), id, self.inner.ttl));
            }
            Err(_) => warn!(id, "No runtime, notification will not auto-dismiss"),
        }
        id
    }

    /// [`notify`](Self::notify) with the default severity.
    pub fn notify_success(&self, message: impl Into<String>) -> u64 {
        self.notify(message, Severity::default())
    }

    pub fn notification(&self) -> Option<Notification> {
        self.inner.notification.borrow().clone()
    }

    pub fn subscribe_notifications(&self) -> watch::Receiver<Option<Notification>> {
        self.inner.notification.subscribe()
    }

    pub fn dismiss(&self) {
        self.inner.notification.send_replace(None);
    }
}

async fn dismiss_after(inner: Weak<Inner>, id: u64, ttl: Duration) {
    tokio::time::sleep(ttl).await;
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let dismissed = inner.notification.send_if_modified(|current| {
        if current.as_ref().map(|n| n.id) == Some(id) {
            *current = None;
            true
        } else {
            false
        }
    });
    if dismissed {
        debug!(id, "Notification dismissed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserRole;

    #[tokio::test]
    async fn set_user_replaces_identity() {
        let session = SharedSessionContext::new();
        let mut changes = session.subscribe_user();

        session.set_user(Some(User::new(3, &[UserRole::User])));
        changes.changed().await.unwrap();
        assert_eq!(changes.borrow().as_ref().map(|u| u.user_id), Some(3));

        session.set_user(None);
        assert_eq!(session.user(), None);
    }

    #[tokio::test]
    async fn notification_auto_dismisses() {
        let session = SharedSessionContext::with_notification_ttl(Duration::from_millis(30));
        session.notify_success("Saved");
        assert_eq!(
            session.notification().map(|n| n.severity),
            Some(Severity::Success)
        );

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(session.notification(), None);
    }

    #[tokio::test]
    async fn newer_notification_outlives_older_timer() {
        let session = SharedSessionContext::with_notification_ttl(Duration::from_millis(200));
        session.notify("First", Severity::Info);
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = session.notify("Second", Severity::Warning);

        // First timer fires here and must leave "Second" alone.
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(session.notification().map(|n| n.id), Some(second));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(session.notification(), None);
    }
}
