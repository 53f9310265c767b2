//! HTTP server
//!
//! Hosts the health and monitoring endpoints over the bootstrapped services.

pub mod builder;
pub mod middleware;
pub mod routes;
#[allow(clippy::module_inception)]
pub mod server;
pub mod state;


pub use builder::{Runtime, run_server};
pub use server::HttpServer;
pub use state::AppState;
