//! Embedding providers
//!
//! Both providers speak the OpenAI-style `/embeddings` shape and differ only
//! in how the input is wrapped and whether a bearer token is sent. Which one
//! the server uses is decided once at startup from configuration.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const OPENAI_DEFAULT_MODEL: &str = "text-embedding-3-small";
pub const LLAMA_DEFAULT_BASE_URL: &str = "http://localhost:8081";
pub const LLAMA_DEFAULT_MODEL: &str = "llama-text-embed-v2";

#[derive(Debug, Error)]
pub enum EmbeddingError {
  #[error("{provider} error: {source}")]
  Request {
    provider: &'static str,
    #[source]
    source: reqwest::Error,
  },

  #[error("embedding request failed ({status}): {body}")]
  Status { status: StatusCode, body: String },

  #[error("failed to parse response: {0}")]
  Malformed(String),

  #[error("no embedding received: {0}")]
  Empty(String),
}

/// Text to vector conversion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
  async fn create_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

// Wire Types
// ==========

#[derive(Serialize)]
struct OpenAiEmbeddingRequest<'a> {
  model: &'a str,
  input: &'a str,
}

#[derive(Serialize)]
struct LlamaEmbeddingRequest<'a> {
  model: &'a str,
  input: [&'a str; 1],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
  #[serde(default)]
  data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
  embedding: Vec<f32>,
}

// OpenAI
// ======

/// Hosted OpenAI embeddings API
pub struct OpenAiEmbedder {
  client: Client,
  base_url: String,
  api_key: String,
  model: String,
}

impl OpenAiEmbedder {
  pub fn new(client: Client, api_key: impl Into<String>) -> Self {
    Self {
      client,
      base_url: OPENAI_DEFAULT_BASE_URL.to_string(),
      api_key: api_key.into(),
      model: OPENAI_DEFAULT_MODEL.to_string(),
    }
  }

  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  pub fn with_model(mut self, model: impl Into<String>) -> Self {
    self.model = model.into();
    self
  }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
  async fn create_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
    let url = endpoint(&self.base_url);
    let request = OpenAiEmbeddingRequest { model: &self.model, input: text };

    let response = self
      .client
      .post(&url)
      .bearer_auth(&self.api_key)
      .json(&request)
      .send()
      .await
      .map_err(|source| EmbeddingError::Request { provider: "OpenAI", source })?;

    read_embedding(response, "OpenAI").await
  }
}

// Llama
// =====

/// Self-hosted llama embedding server, no authentication
pub struct LlamaEmbedder {
  client: Client,
  base_url: String,
  model: String,
}

impl LlamaEmbedder {
  pub fn new(client: Client) -> Self {
    Self {
      client,
      base_url: LLAMA_DEFAULT_BASE_URL.to_string(),
      model: LLAMA_DEFAULT_MODEL.to_string(),
    }
  }

  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  pub fn with_model(mut self, model: impl Into<String>) -> Self {
    self.model = model.into();
    self
  }
}

#[async_trait]
impl EmbeddingProvider for LlamaEmbedder {
  async fn create_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
    let url = endpoint(&self.base_url);
    let request = LlamaEmbeddingRequest { model: &self.model, input: [text] };

    let response = self
      .client
      .post(&url)
      .json(&request)
      .send()
      .await
      .map_err(|source| EmbeddingError::Request { provider: "Llama", source })?;

    read_embedding(response, "Llama").await
  }
}

// Shared response handling
// ========================

fn endpoint(base_url: &str) -> String {
  format!("{}/embeddings", base_url.trim_end_matches('/'))
}

async fn read_embedding(
  response: reqwest::Response,
  provider: &'static str,
) -> Result<Vec<f32>, EmbeddingError> {
  let status = response.status();
  let body =
    response.text().await.map_err(|source| EmbeddingError::Request { provider, source })?;

  tracing::debug!(provider, %status, "embedding API responded");

  if !status.is_success() {
    return Err(EmbeddingError::Status { status, body });
  }

  let parsed: EmbeddingResponse =
    serde_json::from_str(&body).map_err(|e| EmbeddingError::Malformed(e.to_string()))?;

  parsed.data.into_iter().next().map(|d| d.embedding).ok_or(EmbeddingError::Empty(body))
}
