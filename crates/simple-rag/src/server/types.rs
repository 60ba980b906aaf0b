//! REST API wire types for responses that are not part of the data model

use axum::{
  http::StatusCode,
  response::{IntoResponse, Json, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// Status Endpoint
// ===============

/// Response for GET /health
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
  pub status: String,
  pub service: String,
  pub timestamp: String,
  pub version: String,
}

// Ingest Endpoint
// ===============

/// Response for POST /ingest
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
  pub message: String,
  pub document_count: usize,
}

// Fallback
// ========

/// Response for any path the router does not know about
#[derive(Debug, Serialize, Deserialize)]
pub struct NotFoundResponse {
  pub error: String,
  pub path: String,
  pub method: String,
  pub timestamp: String,
  pub available_endpoints: Vec<String>,
}

// Errors
// ======

/// JSON body carried by every 4xx/5xx produced by a handler
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
  pub error: String,
}

/// Handler error: an HTTP status plus the message surfaced to the caller
#[derive(Debug)]
pub struct ApiError {
  pub status: StatusCode,
  pub message: String,
}

impl ApiError {
  pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
    Self { status, message: message.into() }
  }

  /// 400 for a body that could not be decoded
  pub fn invalid_json(detail: impl std::fmt::Display) -> Self {
    Self::new(StatusCode::BAD_REQUEST, format!("Invalid JSON: {detail}"))
  }

  /// 500 for a failure in one of the dependent services
  pub fn internal(message: impl Into<String>) -> Self {
    Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status, Json(ErrorResponse { error: self.message })).into_response()
  }
}

/// Current UTC time in RFC 3339, second precision
pub fn timestamp_now() -> String {
  Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
