//! Document ingestion endpoint

use axum::{extract::State, response::Json};

use crate::server::extract::JsonBody;
use crate::server::models::IngestionRequest;
use crate::server::routing::AppState;
use crate::server::types::{ApiError, IngestResponse};

/// POST /ingest - Embed and store a batch of documents, all or nothing
pub async fn ingest(
  State(state): State<AppState>,
  JsonBody(request): JsonBody<IngestionRequest>,
) -> Result<Json<IngestResponse>, ApiError> {
  let document_count = state.rag.ingest(request).await.map_err(|e| {
    tracing::error!("Ingestion failed: {e}");
    ApiError::internal(format!("Ingestion failed: {e}"))
  })?;

  tracing::info!("Ingested {document_count} documents");

  Ok(Json(IngestResponse { message: "Documents added successfully".to_string(), document_count }))
}
