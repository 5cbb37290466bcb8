//! [`ApiError`] — what a graph query handler can fail with, and how each
//! failure maps onto an HTTP status.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// A failed graph query.
#[derive(Debug, Error)]
pub enum ApiError {
  /// No article row carries this name. The name is already normalised to
  /// its `PMC...` form when the error is built.
  #[error("no article named {0}")]
  ArticleNotFound(String),

  /// A path segment that should have been a `kb_name:kb_id` participant
  /// key did not parse as one.
  #[error(transparent)]
  InvalidParticipantKey(#[from] regnet_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::ArticleNotFound(_) => StatusCode::NOT_FOUND,
      ApiError::InvalidParticipantKey(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
