//! Handlers for `/animals` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/animals/{institution_id}` | Public; active animals only |
//! | `POST`   | `/animals` | Admin; body: [`CreateAnimalBody`] |
//! | `PUT`    | `/animals/{id}` | Admin of the owning institution; body: [`UpdateAnimalBody`] |
//! | `DELETE` | `/animals/{id}` | Admin of the owning institution |

use axum::{Json, extract::State};
use shelter_core::{
  animal::{Animal, AnimalListing},
  pipeline::{self, Deleted},
  store::AdoptionStore,
  validate::{CreateAnimalBody, UpdateAnimalBody},
};

use crate::{
  AppState,
  auth::Authenticated,
  error::ApiError,
  extract::{JsonBody, PathParam},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /animals/{institution_id}`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  PathParam(institution_id): PathParam<i64>,
) -> Result<Json<Vec<AnimalListing>>, ApiError>
where
  S: AdoptionStore + Clone + 'static,
{
  let animals =
    pipeline::list_animals(state.store.as_ref(), institution_id, &state.config.files_url)
      .await?;
  Ok(Json(animals))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /animals` — returns 200 + the stored [`Animal`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  JsonBody(body): JsonBody<CreateAnimalBody>,
) -> Result<Json<Animal>, ApiError>
where
  S: AdoptionStore + Clone + 'static,
{
  let animal = pipeline::create_animal(state.store.as_ref(), actor, body).await?;
  Ok(Json(animal))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /animals/{id}` — only the fields present in the body are applied.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  PathParam(id): PathParam<i64>,
  JsonBody(body): JsonBody<UpdateAnimalBody>,
) -> Result<Json<Animal>, ApiError>
where
  S: AdoptionStore + Clone + 'static,
{
  let animal = pipeline::update_animal(state.store.as_ref(), actor, id, body).await?;
  Ok(Json(animal))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /animals/{id}` — returns a confirmation message, not the animal.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  PathParam(id): PathParam<i64>,
) -> Result<Json<Deleted>, ApiError>
where
  S: AdoptionStore + Clone + 'static,
{
  let deleted = pipeline::delete_animal(state.store.as_ref(), actor, id).await?;
  Ok(Json(deleted))
}
