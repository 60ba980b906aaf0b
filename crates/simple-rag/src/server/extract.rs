//! Request body extraction
//!
//! Bodies are decoded regardless of the request's Content-Type header; any
//! read or decode problem becomes a 400 whose message starts with
//! `Invalid JSON`.

use axum::{
  body::Bytes,
  extract::{FromRequest, Request},
  http::StatusCode,
};
use serde::de::DeserializeOwned;

use crate::server::config::READ_TIMEOUT;
use crate::server::types::ApiError;

/// JSON request body decoded with field-path aware error messages
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let bytes = match tokio::time::timeout(READ_TIMEOUT, Bytes::from_request(req, state)).await {
      Ok(Ok(bytes)) => bytes,
      Ok(Err(rejection)) => return Err(ApiError::invalid_json(rejection.body_text())),
      Err(_) => {
        return Err(ApiError::new(StatusCode::REQUEST_TIMEOUT, "Timed out reading request body"))
      }
    };

    decode(&bytes).map(JsonBody)
  }
}

/// Decode `bytes` into `T`, naming the offending field path on failure
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
  let deserializer = &mut serde_json::Deserializer::from_slice(bytes);
  serde_path_to_error::deserialize(deserializer).map_err(|err| {
    let path = err.path().to_string();
    let inner = err.into_inner();
    if path == "." {
      ApiError::invalid_json(inner)
    } else {
      ApiError::invalid_json(format!("{path}: {inner}"))
    }
  })
}
