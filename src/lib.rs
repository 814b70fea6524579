//! Gantt: project and task tracking backend core.
//!
//! This crate provides the persistence-facing core of a project/task
//! tracker: projects that own development and design tasks, the task
//! status lifecycle, the periodic overdue sweep, and the notification
//! boundary those operations emit through.
//!
//! # Architecture
//!
//! Gantt follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, mail, etc.)
//!
//! The HTTP CRUD surface, scheduling, and mail transport are host
//! application concerns; this crate exposes the services they call into.
//!
//! # Modules
//!
//! - [`tracker`]: Projects, tasks, the overdue sweep, and notifications

pub mod tracker;
