//! Pinecone data-plane adapter
//!
//! Talks to a serverless index over REST. The index endpoint is resolved from
//! the configured host on every call; only the HTTP connection pool inside the
//! injected client is reused.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::server::models::Document;
use crate::server::services::vector_database::{
  VectorDatabase, VectorStoreError, DEFAULT_SEARCH_TOP_K,
};

const API_VERSION: &str = "2025-01";
const CONTENT_FIELD: &str = "content";

pub struct PineconeStore {
  client: Client,
  api_key: String,
  index_host: String,
  namespace: Option<String>,
}

// Wire Types
// ==========

#[derive(Serialize)]
struct UpsertRequest<'a> {
  vectors: Vec<VectorRecord<'a>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  namespace: Option<&'a str>,
}

#[derive(Serialize)]
struct VectorRecord<'a> {
  id: &'a str,
  values: &'a [f32],
  metadata: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
  #[serde(default)]
  upserted_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
  vector: &'a [f32],
  top_k: usize,
  include_metadata: bool,
  include_values: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
  #[serde(default)]
  matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
  id: String,
  #[serde(default)]
  score: f32,
  #[serde(default)]
  metadata: Option<Map<String, Value>>,
}

impl PineconeStore {
  pub fn new(client: Client, api_key: impl Into<String>, index_host: impl Into<String>) -> Self {
    Self { client, api_key: api_key.into(), index_host: index_host.into(), namespace: None }
  }

  pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
    self.namespace = namespace.filter(|ns| !ns.is_empty());
    self
  }

  /// Resolve an endpoint on the index host; bare hosts are reached over https
  fn index_url(&self, path: &str) -> Result<Url, VectorStoreError> {
    let host = self.index_host.trim().trim_end_matches('/');
    if host.is_empty() {
      return Err(VectorStoreError::Connection("index host is empty".to_string()));
    }

    let base = if host.contains("://") { host.to_string() } else { format!("https://{host}") };
    let base = Url::parse(&base)
      .map_err(|e| VectorStoreError::Connection(format!("invalid index host {host}: {e}")))?;

    base.join(path).map_err(|e| VectorStoreError::Connection(e.to_string()))
  }

  async fn post<B: Serialize + ?Sized>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<reqwest::Response, VectorStoreError> {
    let url = self.index_url(path)?;
    let response = self
      .client
      .post(url)
      .header("Api-Key", &self.api_key)
      .header("X-Pinecone-API-Version", API_VERSION)
      .json(body)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(VectorStoreError::Status { status, body });
    }

    Ok(response)
  }
}

fn to_record(doc: &Document) -> Result<VectorRecord<'_>, VectorStoreError> {
  if doc.embedding.is_empty() {
    return Err(VectorStoreError::MalformedRecord {
      id: doc.id.clone(),
      reason: "document has no embedding".to_string(),
    });
  }

  let mut metadata = Map::new();
  metadata.insert(CONTENT_FIELD.to_string(), Value::String(doc.content.clone()));

  Ok(VectorRecord { id: &doc.id, values: &doc.embedding, metadata })
}

fn to_document(hit: QueryMatch) -> Document {
  let content = hit
    .metadata
    .as_ref()
    .and_then(|m| m.get(CONTENT_FIELD))
    .and_then(Value::as_str)
    .unwrap_or_default()
    .to_string();

  Document { id: hit.id, content, embedding: Vec::new() }
}

#[async_trait]
impl VectorDatabase for PineconeStore {
  async fn upsert(&self, documents: &[Document]) -> Result<(), VectorStoreError> {
    if documents.is_empty() {
      tracing::debug!("Empty batch, skipping upsert");
      return Ok(());
    }

    let mut vectors = Vec::with_capacity(documents.len());
    for (i, doc) in documents.iter().enumerate() {
      tracing::debug!(
        "Document {}: id={}, embedding={} dimensions",
        i + 1,
        doc.id,
        doc.embedding.len()
      );
      vectors.push(to_record(doc)?);
    }

    let request = UpsertRequest { vectors, namespace: self.namespace.as_deref() };
    let response = self.post("vectors/upsert", &request).await?;
    let result: UpsertResponse =
      response.json().await.map_err(|e| VectorStoreError::Malformed(e.to_string()))?;

    tracing::info!("Upserted {} vectors", result.upserted_count);
    Ok(())
  }

  async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<Document>, VectorStoreError> {
    let top_k = if top_k == 0 { DEFAULT_SEARCH_TOP_K } else { top_k };

    tracing::debug!("Searching with {}-dimensional vector, top_k={}", vector.len(), top_k);

    let request = QueryRequest {
      vector,
      top_k,
      include_metadata: true,
      include_values: false,
      namespace: self.namespace.as_deref(),
    };
    let response = self.post("query", &request).await?;
    let mut result: QueryResponse =
      response.json().await.map_err(|e| VectorStoreError::Malformed(e.to_string()))?;

    result.matches.sort_by(|a, b| b.score.total_cmp(&a.score));

    tracing::debug!("Search found {} matches", result.matches.len());
    for (i, hit) in result.matches.iter().enumerate() {
      tracing::debug!("  Match {}: {} (score: {:.3})", i + 1, hit.id, hit.score);
    }

    Ok(result.matches.into_iter().map(to_document).collect())
  }
}
