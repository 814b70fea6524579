//! `PostgreSQL` adapters for tracker persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresTrackerStore, TrackerPgPool};
