//! JSON REST API for the shelter adoption service.
//!
//! Exposes an axum [`Router`] backed by any
//! [`shelter_core::store::AdoptionStore`]. Identity is HTTP Basic against the
//! store's users; TLS is the deployment's responsibility.

pub mod admins;
pub mod animals;
pub mod auth;
pub mod error;
pub mod extract;
pub mod institutions;
pub mod settings;

pub use error::ApiError;
pub use settings::ServerConfig;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use shelter_core::store::AdoptionStore;
use tower_http::trace::TraceLayer;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: AdoptionStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router.
///
/// `GET /animals/{id}` reads `id` as an institution id; `PUT` and `DELETE`
/// on the same path read it as an animal id.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: AdoptionStore + Clone + 'static,
{
  Router::new()
    .route("/animals", post(animals::create::<S>))
    .route(
      "/animals/{id}",
      get(animals::list::<S>)
        .put(animals::update::<S>)
        .delete(animals::delete::<S>),
    )
    .route("/isadmins/{id}", get(admins::show::<S>))
    .route("/admins", get(admins::index::<S>).post(admins::create::<S>))
    .route("/admins/{id}", delete(admins::delete::<S>))
    .route("/institutions", get(institutions::index::<S>))
    .route("/institutions/{id}", get(institutions::show::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
