//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use medsetu_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// The request was well-formed but cannot be fulfilled, e.g. no store
  /// serves the requested pincode.
  #[error("unprocessable: {0}")]
  Unprocessable(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self {
    match e {
      e if e.is_not_found() => ApiError::NotFound(e.to_string()),
      e @ CoreError::NoStoreAvailable(_) => ApiError::Unprocessable(e.to_string()),
      e @ (CoreError::PhoneTaken(_)
      | CoreError::StoreHasOrders(_)
      | CoreError::PrescriptionExists(_)) => ApiError::Conflict(e.to_string()),
      e @ CoreError::UnknownStatus(_) => ApiError::BadRequest(e.to_string()),
      CoreError::Backend(source) => ApiError::Store(source),
      e => ApiError::Store(Box::new(e)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
