//! Utility modules for the runtime core
//!
//! - **error**: error types, helpers and HTTP error responses
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;

use std::time::Duration;

/// Milliseconds in a duration as a float, for metric samples
#[inline]
pub fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
