//! Handlers for admin role management.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/isadmins/{institution_id}` | `{"admin": bool}` for the caller |
//! | `GET`    | `/admins` | Admins of the caller's institution |
//! | `POST`   | `/admins` | Admin; body: [`GrantAdminBody`] |
//! | `DELETE` | `/admins/{id}` | Admin of the same institution; not their own role |

use axum::{Json, extract::State};
use shelter_core::{
  institution::{AdminEntry, RoleAssignment},
  pipeline::{self, AdminStatus, Deleted},
  store::AdoptionStore,
  validate::GrantAdminBody,
};

use crate::{
  AppState,
  auth::Authenticated,
  error::ApiError,
  extract::{JsonBody, PathParam},
};

/// `GET /isadmins/{institution_id}`
///
/// Lets a client decide whether to show admin-only controls for an
/// institution.
pub async fn show<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  PathParam(institution_id): PathParam<i64>,
) -> Result<Json<AdminStatus>, ApiError>
where
  S: AdoptionStore + Clone + 'static,
{
  let status = pipeline::is_admin_of(state.store.as_ref(), actor, institution_id).await?;
  Ok(Json(status))
}

/// `GET /admins`
pub async fn index<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
) -> Result<Json<Vec<AdminEntry>>, ApiError>
where
  S: AdoptionStore + Clone + 'static,
{
  let admins = pipeline::list_admins(state.store.as_ref(), actor).await?;
  Ok(Json(admins))
}

/// `POST /admins` — returns the new [`RoleAssignment`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  JsonBody(body): JsonBody<GrantAdminBody>,
) -> Result<Json<RoleAssignment>, ApiError>
where
  S: AdoptionStore + Clone + 'static,
{
  let role = pipeline::grant_admin(state.store.as_ref(), actor, body).await?;
  Ok(Json(role))
}

/// `DELETE /admins/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  PathParam(id): PathParam<i64>,
) -> Result<Json<Deleted>, ApiError>
where
  S: AdoptionStore + Clone + 'static,
{
  let deleted = pipeline::revoke_admin(state.store.as_ref(), actor, id).await?;
  Ok(Json(deleted))
}
