//! HTTP Basic identity extractor.
//!
//! Credentials are `email:password`; the password is checked against the
//! user's stored argon2 hash. A successful check yields the [`Actor`] the
//! pipeline runs as. Role resolution is the pipeline's job, not this one.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;
use shelter_core::{store::AdoptionStore, user::Actor};

use crate::{AppState, error::ApiError};

/// Present in a handler means the request carried valid credentials.
pub struct Authenticated(pub Actor);

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)?
      .to_string(),
  )
}

/// Split an `Authorization: Basic …` header into `(email, password)`.
fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthenticated)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthenticated)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthenticated)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthenticated)?;

  let (email, password) = creds.split_once(':').ok_or(ApiError::Unauthenticated)?;
  Ok((email.to_owned(), password.to_owned()))
}

/// Verify the request's credentials against the store.
pub async fn authenticate<S: AdoptionStore>(
  headers: &HeaderMap,
  store:   &S,
) -> Result<Actor, ApiError> {
  let (email, password) = basic_credentials(headers)?;

  let user = store
    .find_user_by_email(&email)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(ApiError::Unauthenticated)?;

  let parsed_hash = PasswordHash::new(&user.password_hash)
    .map_err(|_| ApiError::Unauthenticated)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthenticated)?;

  tracing::debug!(user_id = user.id, "authenticated");
  Ok(Actor { user_id: user.id })
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: AdoptionStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let actor = authenticate(&parts.headers, state.store.as_ref()).await?;
    Ok(Authenticated(actor))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::{HeaderValue, header};

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  fn basic(user: &str, pass: &str) -> String {
    let encoded = B64.encode(format!("{user}:{pass}"));
    format!("Basic {encoded}")
  }

  #[test]
  fn splits_email_and_password() {
    let (email, password) = basic_credentials(&headers(&basic("ana@example.com", "s:ecret"))).unwrap();
    assert_eq!(email, "ana@example.com");
    assert_eq!(password, "s:ecret");
  }

  #[test]
  fn missing_header() {
    assert!(matches!(
      basic_credentials(&HeaderMap::new()),
      Err(ApiError::Unauthenticated)
    ));
  }

  #[test]
  fn bearer_scheme_is_rejected() {
    assert!(matches!(
      basic_credentials(&headers("Bearer abc")),
      Err(ApiError::Unauthenticated)
    ));
  }

  #[test]
  fn invalid_base64() {
    assert!(matches!(
      basic_credentials(&headers("Basic !!!not-base64!!!")),
      Err(ApiError::Unauthenticated)
    ));
  }

  #[test]
  fn hash_verifies_its_password() {
    let hash = hash_password("secret").unwrap();
    let parsed = PasswordHash::new(&hash).unwrap();
    assert!(Argon2::default().verify_password(b"secret", &parsed).is_ok());
    assert!(Argon2::default().verify_password(b"wrong", &parsed).is_err());
  }
}
