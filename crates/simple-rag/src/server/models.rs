//! Core data model shared by handlers and services

use serde::{Deserialize, Deserializer, Serialize};

/// Missing and `null` fields both decode to the type's empty value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A piece of text and, once ingested, its vector embedding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
  /// Caller-assigned identifier, unique within the vector store
  #[serde(default, deserialize_with = "null_as_default")]
  pub id: String,

  /// The text content
  #[serde(default, deserialize_with = "null_as_default")]
  pub content: String,

  /// Vector representation, filled in during ingest and never echoed back by search
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
  pub embedding: Vec<f32>,
}

impl Document {
  pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
    Self { id: id.into(), content: content.into(), embedding: Vec::new() }
  }
}

/// Body of POST /query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
  /// The user's question
  #[serde(default, deserialize_with = "null_as_default")]
  pub question: String,

  /// How many documents to retrieve; absent or zero means the server default
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub top_k: Option<usize>,
}

/// Body returned by POST /query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
  /// Templated answer text
  pub answer: String,

  /// Documents the answer was built from, most similar first
  pub sources: Vec<Document>,
}

/// Body of POST /ingest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestionRequest {
  #[serde(default, deserialize_with = "null_as_default")]
  pub documents: Vec<Document>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_document_without_embedding_serializes_id_and_content_only() {
    let doc = Document::new("doc-1", "Rust is a systems language.");
    let value = serde_json::to_value(&doc).unwrap();

    assert_eq!(value, serde_json::json!({"id": "doc-1", "content": "Rust is a systems language."}));
  }

  #[test]
  fn test_query_request_defaults_missing_fields() {
    let request: QueryRequest = serde_json::from_str("{}").unwrap();
    assert_eq!(request.question, "");
    assert_eq!(request.top_k, None);
  }

  #[test]
  fn test_null_fields_decode_to_empty_values() {
    let query: QueryRequest = serde_json::from_str(r#"{"question": null, "top_k": null}"#).unwrap();
    assert_eq!(query, QueryRequest::default());

    let ingest: IngestionRequest = serde_json::from_str(r#"{"documents": null}"#).unwrap();
    assert!(ingest.documents.is_empty());

    let ingest: IngestionRequest =
      serde_json::from_str(r#"{"documents": [{"id": null, "content": "x", "embedding": null}]}"#)
        .unwrap();
    assert_eq!(ingest.documents[0], Document::new("", "x"));
  }

  #[test]
  fn test_missing_document_fields_decode_to_empty_values() {
    let ingest: IngestionRequest = serde_json::from_str(r#"{"documents": [{}]}"#).unwrap();
    assert_eq!(ingest.documents[0], Document::default());
  }

  #[test]
  fn test_query_request_rejects_negative_top_k() {
    let result = serde_json::from_str::<QueryRequest>(r#"{"question": "why?", "top_k": -1}"#);
    assert!(result.is_err());
  }

  #[test]
  fn test_ingestion_request_accepts_caller_embedding() {
    let request: IngestionRequest = serde_json::from_str(
      r#"{"documents": [{"id": "a", "content": "x", "embedding": [0.5, 0.25]}], "extra": true}"#,
    )
    .unwrap();

    assert_eq!(request.documents.len(), 1);
    assert_eq!(request.documents[0].embedding, vec![0.5, 0.25]);
  }
}
