//! The request pipeline shared by every entity-mutating endpoint.
//!
//! Each operation runs its steps in a fixed order and awaits each before the
//! next: validate the payload, resolve the caller's role, resolve the target,
//! check tenancy, mutate, shape the response. Any failure ends the request
//! with no partial side effect.
//!
//! Concurrent updates to the same animal are not coordinated; the last write
//! wins.

use serde::Serialize;

use crate::{
  Error, Result,
  animal::{Animal, AnimalListing, NewAnimal},
  institution::{AdminEntry, Institution, RoleAssignment},
  policy::{authorize, is_member},
  store::AdoptionStore,
  user::Actor,
  validate::{CreateAnimalBody, GrantAdminBody, UpdateAnimalBody, Validate},
};

// ─── Caller ──────────────────────────────────────────────────────────────────

/// An actor together with its (optional) role assignment.
#[derive(Debug, Clone)]
pub struct Caller {
  pub actor: Actor,
  pub role:  Option<RoleAssignment>,
}

impl Caller {
  /// The caller's role assignment, or `Unauthorized` for plain users.
  pub fn require_admin(&self) -> Result<&RoleAssignment> {
    self
      .role
      .as_ref()
      .ok_or_else(|| Error::Unauthorized("not authorized".into()))
  }
}

/// Look up the role assignment held by `actor`.
pub async fn resolve_caller<S: AdoptionStore>(store: &S, actor: Actor) -> Result<Caller> {
  let role = store.find_role(actor.user_id).await.map_err(Error::store)?;
  Ok(Caller { actor, role })
}

// ─── Responses ───────────────────────────────────────────────────────────────

/// Confirmation returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deleted {
  pub message: String,
}

/// Whether the caller administers a given institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdminStatus {
  pub admin: bool,
}

// ─── Animals ─────────────────────────────────────────────────────────────────

/// Active animals of `institution_id`, projected for public display.
pub async fn list_animals<S: AdoptionStore>(
  store: &S,
  institution_id: i64,
  files_url: &str,
) -> Result<Vec<AnimalListing>> {
  let rows = store
    .list_animals(institution_id)
    .await
    .map_err(Error::store)?;
  Ok(
    rows
      .into_iter()
      .map(|row| row.into_listing(files_url))
      .collect(),
  )
}

/// Register a new animal under the caller's institution.
pub async fn create_animal<S: AdoptionStore>(
  store: &S,
  actor: Actor,
  body: CreateAnimalBody,
) -> Result<Animal> {
  let draft = body.validate()?;

  let caller = resolve_caller(store, actor).await?;
  let role = caller.require_admin()?;

  let input = NewAnimal::from_draft(draft, actor.user_id, role.institution_id);
  let animal = store.create_animal(input).await.map_err(Error::store)?;

  tracing::info!(
    animal_id = animal.id,
    institution_id = animal.institution_id,
    "animal created"
  );
  Ok(animal)
}

/// Apply a partial update to an animal of the caller's institution.
pub async fn update_animal<S: AdoptionStore>(
  store: &S,
  actor: Actor,
  id: i64,
  body: UpdateAnimalBody,
) -> Result<Animal> {
  let patch = body.validate()?;

  let caller = resolve_caller(store, actor).await?;
  let role = caller.require_admin()?;

  let animal = store
    .get_animal(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound("animal not found".into()))?;

  authorize(role, &animal)?;

  if patch.is_empty() {
    return Ok(animal);
  }

  let updated = store
    .update_animal(id, patch)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound("animal not found".into()))?;

  tracing::info!(animal_id = id, "animal updated");
  Ok(updated)
}

/// Hard-delete an animal of the caller's institution.
///
/// The animal is resolved before the caller's role, so a missing id reports
/// "not found" even to plain users.
pub async fn delete_animal<S: AdoptionStore>(
  store: &S,
  actor: Actor,
  id: i64,
) -> Result<Deleted> {
  let animal = store
    .get_animal(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound("animal not found".into()))?;

  let caller = resolve_caller(store, actor).await?;
  let denied = || {
    Error::Unauthorized("only administrators of the owning institution can delete".into())
  };
  let role = caller.require_admin().map_err(|_| denied())?;
  authorize(role, &animal).map_err(|_| denied())?;

  if !store.delete_animal(id).await.map_err(Error::store)? {
    return Err(Error::NotFound("animal not found".into()));
  }

  tracing::info!(animal_id = id, "animal deleted");
  Ok(Deleted {
    message: "animal record deleted".into(),
  })
}

// ─── Institutions ────────────────────────────────────────────────────────────

pub async fn list_institutions<S: AdoptionStore>(store: &S) -> Result<Vec<Institution>> {
  store.list_institutions().await.map_err(Error::store)
}

pub async fn show_institution<S: AdoptionStore>(store: &S, id: i64) -> Result<Institution> {
  store
    .get_institution(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound("institution not found".into()))
}

/// Report whether the caller administers `institution_id`.
pub async fn is_admin_of<S: AdoptionStore>(
  store: &S,
  actor: Actor,
  institution_id: i64,
) -> Result<AdminStatus> {
  let institution = store
    .get_institution(institution_id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound("institution not found".into()))?;

  let caller = resolve_caller(store, actor).await?;
  let admin = caller
    .role
    .as_ref()
    .is_some_and(|role| is_member(role, &institution));

  Ok(AdminStatus { admin })
}

// ─── Admins ──────────────────────────────────────────────────────────────────

/// Admins of the caller's own institution.
pub async fn list_admins<S: AdoptionStore>(store: &S, actor: Actor) -> Result<Vec<AdminEntry>> {
  let caller = resolve_caller(store, actor).await?;
  let role = caller.require_admin()?;
  store
    .list_admins(role.institution_id)
    .await
    .map_err(Error::store)
}

/// Make the user named by `body.email` an admin of the caller's institution.
pub async fn grant_admin<S: AdoptionStore>(
  store: &S,
  actor: Actor,
  body: GrantAdminBody,
) -> Result<RoleAssignment> {
  let email = body.validate()?;

  let caller = resolve_caller(store, actor).await?;
  let role = caller.require_admin()?;

  let user = store
    .find_user_by_email(&email)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound("user not found".into()))?;

  if store
    .find_role(user.id)
    .await
    .map_err(Error::store)?
    .is_some()
  {
    return Err(Error::Validation("user is already an administrator".into()));
  }

  let granted = store
    .grant_admin(user.id, role.institution_id)
    .await
    .map_err(Error::store)?;

  tracing::info!(
    user_id = user.id,
    institution_id = granted.institution_id,
    "admin granted"
  );
  Ok(granted)
}

/// Revoke a role assignment of the caller's institution. An admin cannot
/// revoke their own assignment.
pub async fn revoke_admin<S: AdoptionStore>(store: &S, actor: Actor, id: i64) -> Result<Deleted> {
  let caller = resolve_caller(store, actor).await?;
  let role = caller.require_admin()?;

  let target = store
    .get_role(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound("admin not found".into()))?;

  authorize(role, &target)?;

  if target.user_id == actor.user_id {
    return Err(Error::Validation("cannot revoke your own admin role".into()));
  }

  if !store.revoke_admin(id).await.map_err(Error::store)? {
    return Err(Error::NotFound("admin not found".into()));
  }

  tracing::info!(role_id = id, user_id = target.user_id, "admin revoked");
  Ok(Deleted {
    message: "admin removed".into(),
  })
}

#[cfg(test)]
mod tests;
