//! Server configuration
//!
//! Every option can come from a flag or from the environment. Timeouts are
//! fixed constants.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::server::services::embeddings::{
  LLAMA_DEFAULT_BASE_URL, LLAMA_DEFAULT_MODEL, OPENAI_DEFAULT_BASE_URL, OPENAI_DEFAULT_MODEL,
};

/// Time allowed for a request body to arrive
pub const READ_TIMEOUT: Duration = Duration::from_secs(15);
/// Time allowed to produce a full response
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(30);
/// Keep-alive budget for idle connections
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(60);
/// Grace window for in-flight requests after a shutdown signal
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);
/// Timeout on every outbound call to the embedding and vector providers
pub const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(30);

/// Which embedding provider backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmbeddingProviderKind {
  /// Hosted OpenAI embeddings API
  #[value(name = "openai")]
  OpenAi,
  /// Self-hosted llama embedding server
  Llama,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "simple_rag_server")]
#[command(about = "Minimal retrieval-augmented-generation HTTP service")]
#[command(version)]
pub struct ServerConfig {
  /// Server bind address
  #[arg(long, env = "RAG_BIND", default_value = "0.0.0.0:8080")]
  pub bind: SocketAddr,

  /// Embedding provider to use
  #[arg(long, env = "RAG_EMBEDDING_PROVIDER", value_enum, default_value = "openai")]
  pub embedding_provider: EmbeddingProviderKind,

  /// OpenAI API key
  #[arg(long, env = "OPENAI_API_KEY", default_value = "", hide_env_values = true)]
  pub openai_api_key: String,

  /// OpenAI API base URL
  #[arg(long, env = "OPENAI_BASE_URL", default_value = OPENAI_DEFAULT_BASE_URL)]
  pub openai_base_url: String,

  /// OpenAI embedding model
  #[arg(long, env = "OPENAI_EMBEDDING_MODEL", default_value = OPENAI_DEFAULT_MODEL)]
  pub openai_model: String,

  /// Llama embedding server base URL
  #[arg(long, env = "LLAMA_BASE_URL", default_value = LLAMA_DEFAULT_BASE_URL)]
  pub llama_base_url: String,

  /// Llama embedding model
  #[arg(long, env = "LLAMA_EMBEDDING_MODEL", default_value = LLAMA_DEFAULT_MODEL)]
  pub llama_model: String,

  /// Pinecone API key
  #[arg(long, env = "PINECONE_API_KEY", default_value = "", hide_env_values = true)]
  pub pinecone_api_key: String,

  /// Pinecone index host, with or without scheme
  #[arg(long, env = "PINECONE_INDEX_HOST")]
  pub pinecone_index_host: String,

  /// Pinecone namespace (default namespace when unset)
  #[arg(long, env = "PINECONE_NAMESPACE")]
  pub pinecone_namespace: Option<String>,

  /// Enable verbose logging
  #[arg(short, long)]
  pub verbose: bool,
}
