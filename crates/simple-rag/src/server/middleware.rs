//! Request context middleware
//!
//! Tags every request with an id and logs its start and completion. The
//! handler runs inside a `request` span carrying that id, so anything it logs
//! (failures included) can be tied back to the request.

use axum::{
  extract::Request,
  http::{HeaderMap, Method, Uri},
  middleware::Next,
  response::Response,
};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Request metadata logged around every request
#[derive(Debug, Clone)]
pub struct RequestContext {
  /// Unique ID for this request
  pub request_id: Uuid,
  pub method: Method,
  pub uri: Uri,
  pub user_agent: String,
}

impl RequestContext {
  pub fn new(method: Method, uri: Uri, headers: &HeaderMap) -> Self {
    let user_agent = headers
      .get("user-agent")
      .and_then(|v| v.to_str().ok())
      .unwrap_or("none")
      .to_string();

    Self { request_id: Uuid::new_v4(), method, uri, user_agent }
  }

  pub fn log_request_start(&self) {
    tracing::info!(
      request_id = %self.request_id,
      user_agent = %self.user_agent,
      "{} {} - Request started",
      self.method,
      self.uri.path()
    );
  }

  pub fn log_request_complete(&self, status_code: u16, duration_ms: f64) {
    tracing::info!(
      request_id = %self.request_id,
      status = status_code,
      duration_ms = format_args!("{duration_ms:.2}"),
      "{} {} - Request completed",
      self.method,
      self.uri.path()
    );
  }
}

/// Middleware to log every request under its own id
pub async fn request_context_middleware(request: Request, next: Next) -> Response {
  let context =
    RequestContext::new(request.method().clone(), request.uri().clone(), request.headers());

  let start_time = Instant::now();
  context.log_request_start();

  let span = tracing::info_span!("request", request_id = %context.request_id);
  let response = next.run(request).instrument(span).await;

  let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
  context.log_request_complete(response.status().as_u16(), duration_ms);

  response
}
