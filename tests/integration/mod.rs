//! Integration tests for pg-overlay.

pub mod connection_test;
pub mod pipeline_test;
pub mod query_test;
