//! Configuration data models
//!
//! This module defines all configuration structures used by the runtime core.

pub mod app;
pub mod bootstrap;
pub mod logging;
pub mod monitoring;
pub mod server;
pub mod services;

// Re-export all configuration types
pub use app::*;
pub use bootstrap::*;
pub use logging::*;
pub use monitoring::*;
pub use server::*;
pub use services::*;

/// Default server host
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    5014
}

pub(crate) fn default_true() -> bool {
    true
}
