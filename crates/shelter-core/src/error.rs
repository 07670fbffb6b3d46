//! Error types for `shelter-core`.
//!
//! Every variant is a terminal outcome for the request that produced it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The payload does not match the declared request shape.
  #[error("validation failed: {0}")]
  Validation(String),

  /// The caller has no role assignment, or it belongs to another institution.
  #[error("{0}")]
  Unauthorized(String),

  /// The target resource does not exist.
  #[error("{0}")]
  NotFound(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
