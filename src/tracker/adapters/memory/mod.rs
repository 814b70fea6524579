//! In-memory adapters for tracker tests and lightweight deployments.

mod mailbox;
mod store;

pub use mailbox::{InMemoryMailbox, OutboundMessage};
pub use store::InMemoryTrackerStore;
