//! Question answering endpoint

use axum::{extract::State, response::Json};

use crate::server::extract::JsonBody;
use crate::server::models::{QueryRequest, QueryResponse};
use crate::server::routing::AppState;
use crate::server::types::ApiError;

/// POST /query - Answer a question from the nearest stored documents
pub async fn query(
  State(state): State<AppState>,
  JsonBody(request): JsonBody<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
  let question = request.question.clone();

  let response = state.rag.query(request).await.map_err(|e| {
    tracing::error!("Query failed: {e}");
    ApiError::internal(format!("Query failed: {e}"))
  })?;

  tracing::info!("Processed query: {question}");
  Ok(Json(response))
}
