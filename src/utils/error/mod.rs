//! Error handling for the runtime core
//!
//! This module defines all error types used throughout the crate.

mod bootstrap;
mod helpers;
mod response;
mod types;

pub use bootstrap::BootstrapError;
pub use response::{ErrorDetail, ErrorResponse};
pub use types::{FormulaError, Result};
