//! Vector database abstraction
//!
//! The external index is the sole source of truth for stored vectors; this
//! trait is the seam the RAG pipeline talks to, so the Pinecone adapter can be
//! swapped for another index or a mock.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::server::models::Document;

/// Result count used when a caller asks the store for zero results
pub const DEFAULT_SEARCH_TOP_K: usize = 5;

#[derive(Debug, Error)]
pub enum VectorStoreError {
  #[error("failed to connect to index: {0}")]
  Connection(String),

  #[error("malformed record for document {id}: {reason}")]
  MalformedRecord { id: String, reason: String },

  #[error("vector store request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("vector store returned {status}: {body}")]
  Status { status: StatusCode, body: String },

  #[error("failed to parse vector store response: {0}")]
  Malformed(String),
}

/// Upsert and similarity search against an external index
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorDatabase: Send + Sync {
  /// Insert or replace every document by id in one remote call
  async fn upsert(&self, documents: &[Document]) -> Result<(), VectorStoreError>;

  /// Nearest neighbours of `vector`, most similar first; `top_k == 0` means
  /// [`DEFAULT_SEARCH_TOP_K`]. Results carry id and content, never the vector.
  async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<Document>, VectorStoreError>;
}
