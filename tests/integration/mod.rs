//! Integration tests for formula-core
//!
//! These tests verify the interaction between multiple components
//! using real services and scripted doubles, without mocking frameworks.

pub mod bootstrap_tests;
pub mod config_tests;
pub mod monitoring_tests;
pub mod runtime_tests;
