//! Health check and bootstrap status endpoints

use super::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use tracing::{debug, warn};

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/api/system/bootstrap", web::get().to(bootstrap_report))
        .route("/api/system/version", web::get().to(version_info));
}

/// Aggregate health of every registered service
///
/// Answers 200 when every service is operational and 503 otherwise, so load
/// balancers can act on the status code alone.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    debug!("Health check requested");

    let snapshot = state.registry.perform_health_check().await;
    if snapshot.is_healthy() {
        HttpResponse::Ok().json(snapshot)
    } else {
        warn!(
            "Health check degraded: {}/{} services operational",
            snapshot.healthy_services, snapshot.total_services
        );
        HttpResponse::ServiceUnavailable().json(snapshot)
    }
}

/// Outcome of the initialization walk
async fn bootstrap_report(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(state.registry.report()))
}

async fn version_info() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(crate::build_info()))
}
