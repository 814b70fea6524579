//! Unit and service tests for the tracker module.

mod overdue_rule_tests;
mod service_tests;
mod store_tests;
