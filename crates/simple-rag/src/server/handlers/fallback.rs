//! Handlers for requests no route accepts

use axum::{
  http::{Method, StatusCode, Uri},
  response::{IntoResponse, Json},
};

use crate::server::routing::AVAILABLE_ENDPOINTS;
use crate::server::types::{timestamp_now, NotFoundResponse};

/// Any unregistered path
pub async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
  tracing::warn!("No route for {} {}", method, uri.path());

  let response = NotFoundResponse {
    error: "Endpoint not found".to_string(),
    path: uri.path().to_string(),
    method: method.to_string(),
    timestamp: timestamp_now(),
    available_endpoints: AVAILABLE_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
  };

  (StatusCode::NOT_FOUND, Json(response))
}

/// A registered path hit with the wrong method
pub async fn method_not_allowed() -> impl IntoResponse {
  (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
