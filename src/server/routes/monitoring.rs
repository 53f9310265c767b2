//! Monitoring endpoints

use super::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::info;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/monitoring")
            .route("/status", web::get().to(status))
            .route("/metrics", web::get().to(metrics))
            .route("/trends", web::get().to(trends))
            .route("/alerts", web::get().to(alerts))
            .route("/alerts/{id}/acknowledge", web::post().to(acknowledge)),
    );
}

/// Query parameters of the alert listing
#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    /// Maximum number of history entries, newest first
    pub limit: Option<usize>,
}

async fn status(state: web::Data<AppState>) -> Result<HttpResponse> {
    let monitor = state.monitor()?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(monitor.service_status())))
}

async fn metrics(state: web::Data<AppState>) -> Result<HttpResponse> {
    let monitor = state.monitor()?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(monitor.current_metrics())))
}

async fn trends(state: web::Data<AppState>) -> Result<HttpResponse> {
    let monitor = state.monitor()?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(monitor.performance_trends())))
}

async fn alerts(
    state: web::Data<AppState>,
    query: web::Query<AlertQuery>,
) -> Result<HttpResponse> {
    let alerts = state.monitor()?.alerts();
    let body = serde_json::json!({
        "active": alerts.active_alerts(),
        "history": alerts.history(query.limit),
        "stats": alerts.stats(),
    });
    Ok(HttpResponse::Ok().json(ApiResponse::success(body)))
}

async fn acknowledge(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    state.monitor()?.alerts().acknowledge(&id)?;

    info!("Alert {} acknowledged over HTTP", id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "acknowledged": id }))))
}
