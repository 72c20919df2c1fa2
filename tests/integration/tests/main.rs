//! End-to-End Integration Tests
//!
//! These tests run the exporter against a mock access management service
//! and inspect the files it writes.

mod common;
mod failures;
mod usage;
