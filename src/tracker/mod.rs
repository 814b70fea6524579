//! Project and task tracking for Gantt.
//!
//! This module implements the tracker core: project and task aggregates,
//! the task status state machine, the periodic overdue sweep that
//! transitions qualifying tasks and notifies the operator, and the
//! creation notifier fired once per newly persisted task. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
