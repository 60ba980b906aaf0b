//! Simple RAG REST Server
//!
//! Answers questions over documents stored in a Pinecone index, embedding
//! text with OpenAI or a self-hosted llama server.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use simple_rag::server::config::ServerConfig;
use simple_rag::server::startup::start_server;

#[tokio::main]
async fn main() -> Result<()> {
  let config = ServerConfig::parse();

  let filter = if config.verbose {
    EnvFilter::new("simple_rag=debug,tower_http=debug,info")
  } else {
    EnvFilter::new("simple_rag=info,tower_http=info,warn")
  };

  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  tracing::info!("Starting Simple RAG Server v{}", env!("CARGO_PKG_VERSION"));
  tracing::info!("Binding to address: {}", config.bind);

  start_server(config).await?;

  Ok(())
}
