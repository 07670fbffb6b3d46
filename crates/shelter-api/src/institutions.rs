//! Handlers for `/institutions`. Both require an authenticated caller.

use axum::{Json, extract::State};
use shelter_core::{institution::Institution, pipeline, store::AdoptionStore};

use crate::{AppState, auth::Authenticated, error::ApiError, extract::PathParam};

/// `GET /institutions`
pub async fn index<S>(
  State(state): State<AppState<S>>,
  Authenticated(_): Authenticated,
) -> Result<Json<Vec<Institution>>, ApiError>
where
  S: AdoptionStore + Clone + 'static,
{
  let institutions = pipeline::list_institutions(state.store.as_ref()).await?;
  Ok(Json(institutions))
}

/// `GET /institutions/{id}`
pub async fn show<S>(
  State(state): State<AppState<S>>,
  Authenticated(_): Authenticated,
  PathParam(id): PathParam<i64>,
) -> Result<Json<Institution>, ApiError>
where
  S: AdoptionStore + Clone + 'static,
{
  let institution = pipeline::show_institution(state.store.as_ref(), id).await?;
  Ok(Json(institution))
}
