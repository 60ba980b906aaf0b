//! Axum router configuration for all endpoints

use std::sync::Arc;

use axum::{
  extract::DefaultBodyLimit,
  routing::{get, post},
  Router,
};

use crate::server::handlers::{fallback, ingest, query, status};
use crate::server::services::rag::RagService;

/// Endpoints advertised by the not-found response
pub const AVAILABLE_ENDPOINTS: [&str; 3] = ["GET /health", "POST /ingest", "POST /query"];

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
  pub rag: Arc<dyn RagService>,
}

impl AppState {
  pub fn new(rag: Arc<dyn RagService>) -> Self {
    Self { rag }
  }
}

/// Create the main application router
pub fn create_router(rag: Arc<dyn RagService>) -> Router {
  Router::new()
    .route(
      "/health",
      get(status::health).head(fallback::method_not_allowed).fallback(fallback::method_not_allowed),
    )
    .route("/ingest", post(ingest::ingest).fallback(fallback::method_not_allowed))
    .route("/query", post(query::query).fallback(fallback::method_not_allowed))
    .fallback(fallback::not_found)
    .layer(DefaultBodyLimit::disable())
    .with_state(AppState::new(rag))
}
