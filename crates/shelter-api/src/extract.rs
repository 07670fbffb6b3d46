//! Extractors that report decode failures as validation errors.
//!
//! axum's own [`Json`] and [`Path`] reject with plain-text bodies; these
//! wrappers keep every error in the API's `{"error": …}` shape.

use axum::{
  Json,
  extract::{FromRequest, FromRequestParts, Path, Request},
  http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Like [`Json`], but a body that does not match `T` is a 400 with the
/// API's JSON error shape instead of axum's plain-text rejection.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state)
      .await
      .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    Ok(JsonBody(value))
  }
}

/// Like [`Path`]; a segment that does not parse as `T` (e.g. `/animals/abc`)
/// is a 400 validation error.
pub struct PathParam<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParam<T>
where
  T: DeserializeOwned + Send,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Path(value) = Path::<T>::from_request_parts(parts, state)
      .await
      .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    Ok(PathParam(value))
  }
}
