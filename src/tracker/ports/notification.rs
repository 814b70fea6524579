//! Notification sink port.
//!
//! The tracker only requires a fire-and-forget delivery capability; the
//! transport (SMTP, webhook, queue) is an adapter concern. Dispatch
//! failure never rolls back the store mutation that triggered it.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Fixed operator address notifications are delivered to unless a service
/// is constructed with a different recipient.
pub const DEFAULT_OPERATOR_RECIPIENT: &str = "admin@example.com";

/// Error returned when the sink fails to deliver a notification.
#[derive(Debug, Clone, Error)]
#[error("notification dispatch failed: {0}")]
pub struct DispatchError(Arc<dyn std::error::Error + Send + Sync>);

impl DispatchError {
    /// Wraps a transport-level delivery error.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }

    /// Creates a dispatch error from a plain message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(std::io::Error::other(message.into()))
    }
}

/// Port for sending a single notification message.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers one message to the given recipient.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when delivery fails. Callers report the
    /// failure but never reverse the mutation that triggered the send.
    async fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), DispatchError>;
}
