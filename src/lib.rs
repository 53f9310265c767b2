//! # Formula Core
//!
//! Service bootstrap, performance monitoring and alerting runtime for the
//! Formula PM backend.
//!
//! - **Bootstrap**: a registry of named services with dependencies, started in
//!   dependency order under per-service and whole-walk timeouts, health checked
//!   concurrently and shut down in reverse order.
//! - **Monitoring**: EMA-smoothed request and query timings, periodic system
//!   sampling into capped historical series, snapshot aggregation.
//! - **Alerting**: threshold rules evaluated on every collection tick with a
//!   cool-down, automatic clearing and best-effort notification of critical
//!   alerts.
//!
//! ## Example
//!
//! ```rust,no_run
//! use formula_core::bootstrap::{Criticality, ServiceRegistry};
//! use formula_core::config::BootstrapConfig;
//! use formula_core::services::SnapshotCache;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> formula_core::Result<()> {
//!     let registry = ServiceRegistry::new(BootstrapConfig::default());
//!     registry.register("cache", Arc::new(SnapshotCache::default()), &[], Criticality::Critical)?;
//!
//!     let report = registry.initialize_all().await?;
//!     println!("started {:?}", report.processed);
//!
//!     registry.shutdown().await;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod bootstrap;
pub mod config;
pub mod monitoring;
pub mod server;
pub mod services;
pub mod utils;

pub use bootstrap::{Criticality, ManagedService, ServiceRegistry};
pub use config::Config;
pub use monitoring::PerformanceMonitor;
pub use utils::error::{BootstrapError, FormulaError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information
#[derive(Debug, Clone, serde::Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Seconds since the Unix epoch at build time
    pub build_time: &'static str,
    /// Short git commit hash
    pub git_hash: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
        }
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
