//! REST server startup and configuration

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use axum::{middleware, Router};
use reqwest::Client;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::server::config::{
  EmbeddingProviderKind, ServerConfig, IDLE_TIMEOUT, OUTBOUND_TIMEOUT, SHUTDOWN_GRACE,
  WRITE_TIMEOUT,
};
use crate::server::listener::IdleTimeoutListener;
use crate::server::middleware::request_context_middleware;
use crate::server::routing::{create_router, AVAILABLE_ENDPOINTS};
use crate::server::services::embeddings::{EmbeddingProvider, LlamaEmbedder, OpenAiEmbedder};
use crate::server::services::pinecone::PineconeStore;
use crate::server::services::rag::{RagPipeline, RagService};

/// Start the REST server and block until it has shut down
pub async fn start_server(config: ServerConfig) -> Result<()> {
  tracing::info!("Initializing services");
  let rag = build_rag_service(&config)?;
  let app = build_app(rag);

  let listener = TcpListener::bind(config.bind)
    .await
    .with_context(|| format!("Failed to bind {}", config.bind))?;

  log_banner(&config);

  run(listener, app, shutdown_signal(), SHUTDOWN_GRACE).await
}

/// Wire the embedding provider and vector store selected by `config`
pub fn build_rag_service(config: &ServerConfig) -> Result<Arc<dyn RagService>> {
  let client = Client::builder()
    .timeout(OUTBOUND_TIMEOUT)
    .build()
    .context("Failed to create HTTP client")?;

  let embedder: Arc<dyn EmbeddingProvider> = match config.embedding_provider {
    EmbeddingProviderKind::OpenAi => Arc::new(
      OpenAiEmbedder::new(client.clone(), &config.openai_api_key)
        .with_base_url(&config.openai_base_url)
        .with_model(&config.openai_model),
    ),
    EmbeddingProviderKind::Llama => Arc::new(
      LlamaEmbedder::new(client.clone())
        .with_base_url(&config.llama_base_url)
        .with_model(&config.llama_model),
    ),
  };
  tracing::info!("Using {:?} embedding provider", config.embedding_provider);

  let store = PineconeStore::new(client, &config.pinecone_api_key, &config.pinecone_index_host)
    .with_namespace(config.pinecone_namespace.clone());
  tracing::info!("Using Pinecone index at {}", config.pinecone_index_host);

  Ok(Arc::new(RagPipeline::new(embedder, Arc::new(store))))
}

/// Router plus the middleware stack every request goes through
pub fn build_app(rag: Arc<dyn RagService>) -> Router {
  create_router(rag).layer(
    ServiceBuilder::new()
      .layer(TraceLayer::new_for_http())
      .layer(TimeoutLayer::new(WRITE_TIMEOUT))
      .layer(middleware::from_fn(request_context_middleware)),
  )
}

/// Serve `app` until `shutdown` resolves, then give in-flight requests up to
/// `grace` to finish before abandoning them
pub async fn run<F>(listener: TcpListener, app: Router, shutdown: F, grace: Duration) -> Result<()>
where
  F: Future<Output = ()> + Send + 'static,
{
  let (cancel_tx, mut cancel_rx) = watch::channel(false);
  let listener = IdleTimeoutListener::new(listener, IDLE_TIMEOUT);

  let mut server = tokio::spawn(async move {
    axum::serve(listener, app)
      .with_graceful_shutdown(async move {
        let _ = cancel_rx.changed().await;
      })
      .await
  });

  tokio::select! {
    _ = shutdown => {
      tracing::info!("Received shutdown signal");
    }
    result = &mut server => {
      return match result {
        Ok(Ok(())) => Err(anyhow!("Server stopped unexpectedly")),
        Ok(Err(e)) => Err(anyhow!("Server failed: {e}")),
        Err(e) => Err(anyhow!("Server task failed: {e}")),
      };
    }
  }

  tracing::info!("Shutting down server");
  let _ = cancel_tx.send(true);

  match tokio::time::timeout(grace, server).await {
    Ok(Ok(Ok(()))) => {
      tracing::info!("Server shutdown gracefully");
      Ok(())
    }
    Ok(Ok(Err(e))) => Err(anyhow!("shutdown failed: {e}")),
    Ok(Err(e)) => Err(anyhow!("Server task failed: {e}")),
    Err(_) => {
      tracing::warn!("Shutdown grace window of {grace:?} elapsed, abandoning in-flight requests");
      Ok(())
    }
  }
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!("Failed to listen for Ctrl+C: {e}");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut signal) => {
        signal.recv().await;
      }
      Err(e) => {
        tracing::error!("Failed to listen for SIGTERM: {e}");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
}

fn log_banner(config: &ServerConfig) {
  tracing::info!("=================================");
  tracing::info!("Simple RAG server is ready");
  tracing::info!("URL: http://{}", config.bind);
  tracing::info!("Available endpoints:");
  for endpoint in AVAILABLE_ENDPOINTS {
    tracing::info!("  {endpoint}");
  }
  tracing::info!("Press Ctrl+C to shut down gracefully");
  tracing::info!("=================================");
}
