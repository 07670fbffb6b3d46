//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as `{"error": "<message>"}`. Missing resources map to
//! 401 rather than 404 so that "absent" and "not yours" look alike.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("validation failed: {0}")]
  Validation(String),

  /// No or invalid credentials; the request never reached the pipeline.
  #[error("authentication required")]
  Unauthenticated,

  #[error("{0}")]
  Unauthorized(String),

  #[error("{0}")]
  NotFound(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<shelter_core::Error> for ApiError {
  fn from(e: shelter_core::Error) -> Self {
    use shelter_core::Error as Core;
    match e {
      Core::Validation(m) => ApiError::Validation(m),
      Core::Unauthorized(m) => ApiError::Unauthorized(m),
      Core::NotFound(m) => ApiError::NotFound(m),
      Core::Store(e) => ApiError::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Unauthenticated | ApiError::Unauthorized(_) | ApiError::NotFound(_) => {
        StatusCode::UNAUTHORIZED
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };

    let mut res = (status, Json(json!({ "error": self.to_string() }))).into_response();
    if matches!(self, ApiError::Unauthenticated) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"shelter\""),
      );
    }
    res
  }
}
