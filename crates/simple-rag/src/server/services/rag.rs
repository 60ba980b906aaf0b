//! RAG orchestration
//!
//! Query: question → embedding → nearest documents → templated answer.
//! Ingest: every document → embedding (sequentially) → one batch upsert.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::server::models::{IngestionRequest, QueryRequest, QueryResponse};
use crate::server::services::answer::AnswerBuilder;
use crate::server::services::embeddings::{EmbeddingError, EmbeddingProvider};
use crate::server::services::vector_database::{VectorDatabase, VectorStoreError};

/// Result count used by the query path when the caller gives none
pub const DEFAULT_QUERY_TOP_K: usize = 3;

#[derive(Debug, Error)]
pub enum RagError {
  #[error("embedding failed: {0}")]
  QueryEmbedding(#[source] EmbeddingError),

  #[error("search failed: {0}")]
  Search(#[source] VectorStoreError),

  #[error("failed to embed document {id}: {source}")]
  DocumentEmbedding {
    id: String,
    #[source]
    source: EmbeddingError,
  },

  #[error("failed to store documents: {0}")]
  Store(#[source] VectorStoreError),
}

/// The two operations the HTTP layer needs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RagService: Send + Sync {
  async fn query(&self, request: QueryRequest) -> Result<QueryResponse, RagError>;

  /// Embed and store every document; returns how many were stored
  async fn ingest(&self, request: IngestionRequest) -> Result<usize, RagError>;
}

/// Production pipeline over an embedding provider and a vector database
pub struct RagPipeline {
  embedder: Arc<dyn EmbeddingProvider>,
  store: Arc<dyn VectorDatabase>,
  answers: AnswerBuilder,
}

impl RagPipeline {
  pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorDatabase>) -> Self {
    Self { embedder, store, answers: AnswerBuilder::new() }
  }
}

fn effective_top_k(requested: Option<usize>) -> usize {
  match requested {
    Some(k) if k > 0 => k,
    _ => DEFAULT_QUERY_TOP_K,
  }
}

#[async_trait]
impl RagService for RagPipeline {
  async fn query(&self, request: QueryRequest) -> Result<QueryResponse, RagError> {
    tracing::info!("Processing question: {}", request.question);

    let embedding =
      self.embedder.create_embedding(&request.question).await.map_err(RagError::QueryEmbedding)?;

    let top_k = effective_top_k(request.top_k);
    let sources = self.store.search(&embedding, top_k).await.map_err(RagError::Search)?;

    tracing::info!("Found {} relevant documents", sources.len());

    let answer = self.answers.build(&request.question, &sources);
    Ok(QueryResponse { answer, sources })
  }

  async fn ingest(&self, request: IngestionRequest) -> Result<usize, RagError> {
    let mut documents = request.documents;
    tracing::info!("Ingesting {} documents", documents.len());

    for doc in documents.iter_mut() {
      doc.embedding = self
        .embedder
        .create_embedding(&doc.content)
        .await
        .map_err(|source| RagError::DocumentEmbedding { id: doc.id.clone(), source })?;
    }

    self.store.upsert(&documents).await.map_err(RagError::Store)?;

    tracing::info!("Documents ingested successfully");
    Ok(documents.len())
  }
}
