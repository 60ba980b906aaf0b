pub mod fallback;
pub mod ingest;
pub mod query;
pub mod status;

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
  };
  use serde_json::{json, Value};
  use tower::ServiceExt;

  use crate::server::models::{Document, QueryResponse};
  use crate::server::routing::create_router;
  use crate::server::services::embeddings::EmbeddingError;
  use crate::server::services::rag::{MockRagService, RagError};
  use crate::server::services::vector_database::VectorStoreError;

  fn app(rag: MockRagService) -> Router {
    create_router(Arc::new(rag))
  }

  async fn send(app: Router, method: &str, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
    let request =
      Request::builder().method(method).uri(uri).body(Body::from(body.to_string())).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
  }

  fn as_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
  }

  #[tokio::test]
  async fn test_health_reports_service_metadata() {
    let (status, body) = send(app(MockRagService::new()), "GET", "/health", "").await;

    assert_eq!(status, StatusCode::OK);
    let body = as_json(&body);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "simple-rag");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
  }

  #[tokio::test]
  async fn test_ingest_reports_document_count() {
    let mut rag = MockRagService::new();
    rag
      .expect_ingest()
      .withf(|request| request.documents.len() == 2 && request.documents[1].id == "b")
      .times(1)
      .returning(|request| Ok(request.documents.len()));

    let payload = json!({
      "documents": [
        {"id": "a", "content": "First."},
        {"id": "b", "content": "Second."}
      ]
    });
    let (status, body) = send(app(rag), "POST", "/ingest", &payload.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let body = as_json(&body);
    assert_eq!(body["message"], "Documents added successfully");
    assert_eq!(body["document_count"], 2);
  }

  #[tokio::test]
  async fn test_ingest_rejects_malformed_body() {
    let mut rag = MockRagService::new();
    rag.expect_ingest().never();

    let (status, body) = send(app(rag), "POST", "/ingest", "{\"documents\": [").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(as_json(&body)["error"].as_str().unwrap().starts_with("Invalid JSON"));
  }

  #[tokio::test]
  async fn test_ingest_failure_is_internal_error() {
    let mut rag = MockRagService::new();
    rag.expect_ingest().returning(|_| {
      Err(RagError::DocumentEmbedding {
        id: "a".to_string(),
        source: EmbeddingError::Empty("data array was empty".to_string()),
      })
    });

    let payload = json!({"documents": [{"id": "a", "content": "x"}]});
    let (status, body) = send(app(rag), "POST", "/ingest", &payload.to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = as_json(&body)["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Ingestion failed: "), "{error}");
    assert!(error.contains("failed to embed document a"), "{error}");
  }

  #[tokio::test]
  async fn test_query_returns_answer_and_sources() {
    let mut rag = MockRagService::new();
    rag
      .expect_query()
      .withf(|request| request.question == "What is Rust?" && request.top_k == Some(2))
      .times(1)
      .returning(|_| {
        Ok(QueryResponse {
          answer: "Rust is a language.".to_string(),
          sources: vec![Document::new("rust", "Rust is a language.")],
        })
      });

    let payload = json!({"question": "What is Rust?", "top_k": 2});
    let (status, body) = send(app(rag), "POST", "/query", &payload.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let body = as_json(&body);
    assert_eq!(body["answer"], "Rust is a language.");
    assert_eq!(body["sources"][0]["id"], "rust");
    assert!(body["sources"][0].get("embedding").is_none());
  }

  #[tokio::test]
  async fn test_query_without_top_k_passes_none() {
    let mut rag = MockRagService::new();
    rag
      .expect_query()
      .withf(|request| request.top_k.is_none())
      .times(1)
      .returning(|_| Ok(QueryResponse::default()));

    let (status, _) = send(app(rag), "POST", "/query", r#"{"question": "hi"}"#).await;
    assert_eq!(status, StatusCode::OK);
  }

  #[tokio::test]
  async fn test_query_failure_is_internal_error() {
    let mut rag = MockRagService::new();
    rag
      .expect_query()
      .returning(|_| Err(RagError::Search(VectorStoreError::Connection("refused".to_string()))));

    let (status, body) = send(app(rag), "POST", "/query", r#"{"question": "hi"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = as_json(&body)["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Query failed: search failed: "), "{error}");
  }

  #[tokio::test]
  async fn test_query_rejects_wrong_field_type() {
    let (status, body) =
      send(app(MockRagService::new()), "POST", "/query", r#"{"question": 42}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(as_json(&body)["error"].as_str().unwrap().contains("question"));
  }

  #[tokio::test]
  async fn test_unknown_path_lists_endpoints() {
    let (status, body) = send(app(MockRagService::new()), "DELETE", "/documents/1", "").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let body = as_json(&body);
    assert_eq!(body["error"], "Endpoint not found");
    assert_eq!(body["path"], "/documents/1");
    assert_eq!(body["method"], "DELETE");
    assert_eq!(body["available_endpoints"], json!(["GET /health", "POST /ingest", "POST /query"]));
  }

  #[tokio::test]
  async fn test_wrong_method_on_known_path() {
    for (method, uri) in [("GET", "/query"), ("GET", "/ingest"), ("POST", "/health")] {
      let (status, body) = send(app(MockRagService::new()), method, uri, "").await;

      assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
      assert_eq!(String::from_utf8(body).unwrap(), "Method not allowed");
    }
  }

  #[tokio::test]
  async fn test_head_on_health_is_not_allowed() {
    let (status, _) = send(app(MockRagService::new()), "HEAD", "/health", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
  }

  #[tokio::test]
  async fn test_null_fields_are_treated_as_empty() {
    let mut rag = MockRagService::new();
    rag.expect_ingest().withf(|request| request.documents.is_empty()).returning(|_| Ok(0));
    rag
      .expect_query()
      .withf(|request| request.question.is_empty())
      .returning(|_| Ok(QueryResponse::default()));
    let router = app(rag);

    let (status, body) = send(router.clone(), "POST", "/ingest", r#"{"documents": null}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["document_count"], 0);

    let (status, _) = send(router, "POST", "/query", r#"{"question": null}"#).await;
    assert_eq!(status, StatusCode::OK);
  }
}
