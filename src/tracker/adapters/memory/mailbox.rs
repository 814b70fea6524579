//! Recording notification sink for tests.
//!
//! Keeps every delivered message in an outbox for assertion and can be
//! switched into a failing mode to exercise dispatch-failure paths.

use async_trait::async_trait;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, Ordering},
};

use crate::tracker::ports::{DispatchError, NotificationSink};

/// A message captured by the mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Message subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// Delivery address.
    pub recipient: String,
}

/// In-memory notification sink recording an outbox.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMailbox {
    outbox: Arc<RwLock<Vec<OutboundMessage>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryMailbox {
    /// Creates an empty mailbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches delivery failure on or off.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns a copy of every message delivered so far.
    #[must_use]
    pub fn outbox(&self) -> Vec<OutboundMessage> {
        self.outbox
            .read()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    /// Returns the number of messages delivered so far.
    #[must_use]
    pub fn delivered(&self) -> usize {
        self.outbox.read().map(|messages| messages.len()).unwrap_or(0)
    }

    /// Discards every recorded message.
    pub fn clear(&self) {
        if let Ok(mut messages) = self.outbox.write() {
            messages.clear();
        }
    }
}

#[async_trait]
impl NotificationSink for InMemoryMailbox {
    async fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), DispatchError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DispatchError::message("mailbox configured to fail"));
        }
        let mut messages = self
            .outbox
            .write()
            .map_err(|err| DispatchError::message(err.to_string()))?;
        messages.push(OutboundMessage {
            subject: subject.to_owned(),
            body: body.to_owned(),
            recipient: recipient.to_owned(),
        });
        Ok(())
    }
}
