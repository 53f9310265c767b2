//! HTTP response handling for errors

use super::bootstrap::BootstrapError;
use super::types::FormulaError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

/// JSON body returned for failed requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error code and message
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

impl FormulaError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            FormulaError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            FormulaError::Bootstrap(BootstrapError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "SERVICE_NOT_FOUND")
            }
            FormulaError::Bootstrap(_) => (StatusCode::SERVICE_UNAVAILABLE, "BOOTSTRAP_ERROR"),
            FormulaError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
            FormulaError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            FormulaError::Serialization(_) | FormulaError::Yaml(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SERIALIZATION_ERROR")
            }
            FormulaError::Monitoring(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "MONITORING_ERROR")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl ResponseError for FormulaError {
    fn status_code(&self) -> StatusCode {
        self.status_and_code().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, code) = self.status_and_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: ErrorDetail {
                code,
                message: self.to_string(),
            },
        })
    }
}
