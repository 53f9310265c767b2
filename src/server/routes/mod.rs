//! HTTP route modules
//!
//! Every route is a read-only view over the registry or the monitor, except
//! alert acknowledgement.

pub mod health;
pub mod monitoring;

use actix_web::web;
use serde::Serialize;

/// Envelope for successful responses; failures are rendered by `FormulaError`
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Mount every route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    health::configure_routes(cfg);
    monitoring::configure_routes(cfg);
}
