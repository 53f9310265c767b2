//! Test suite for formula-core
//!
//! ## Test Categories
//!
//! ### 1. Common Utilities (`common/`)
//! Scripted service doubles, metric fixtures and assertion macros.
//!
//! ### 2. Integration Tests (`integration/`)
//! Tests that drive the public API across modules:
//! - Bootstrap walks, failure classification and shutdown
//! - Monitoring, alerting and snapshot persistence
//! - Configuration loading
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all tests
//! cargo test
//!
//! # Run only integration tests
//! cargo test --test lib
//! ```

pub mod common;
pub mod integration;
