//! Liveness endpoint

use axum::response::Json;

use crate::server::types::{timestamp_now, HealthResponse};

pub const SERVICE_NAME: &str = "simple-rag";

/// GET /health - Health check endpoint, no dependencies touched
pub async fn health() -> Json<HealthResponse> {
  Json(HealthResponse {
    status: "healthy".to_string(),
    service: SERVICE_NAME.to_string(),
    timestamp: timestamp_now(),
    version: env!("CARGO_PKG_VERSION").to_string(),
  })
}
