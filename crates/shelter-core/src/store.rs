//! The `AdoptionStore` trait.
//!
//! Implemented by storage backends (e.g. `shelter-store-sqlite`). The request
//! pipeline and the HTTP layer depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  animal::{Animal, AnimalPatch, AnimalWithRelations, NewAnimal},
  institution::{AdminEntry, Institution, NewInstitution, RoleAssignment},
  user::{NewUser, User},
};

/// Abstraction over the adoption platform's persistence engine.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait AdoptionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Fails if the email is already registered.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look up a user by login email. Used by the identity layer.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Institutions & roles ──────────────────────────────────────────────

  fn add_institution(
    &self,
    input: NewInstitution,
  ) -> impl Future<Output = Result<Institution, Self::Error>> + Send + '_;

  fn get_institution(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Institution>, Self::Error>> + Send + '_;

  /// Every institution, ordered by id.
  fn list_institutions(
    &self,
  ) -> impl Future<Output = Result<Vec<Institution>, Self::Error>> + Send + '_;

  /// Make `user_id` an admin of `institution_id`. A user holds at most one
  /// role assignment; a second grant is an error.
  fn grant_admin(
    &self,
    user_id: i64,
    institution_id: i64,
  ) -> impl Future<Output = Result<RoleAssignment, Self::Error>> + Send + '_;

  /// The role assignment held by `user_id`, if any.
  fn find_role(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Option<RoleAssignment>, Self::Error>> + Send + '_;

  /// A role assignment by its own id.
  fn get_role(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<RoleAssignment>, Self::Error>> + Send + '_;

  /// Admins of one institution joined with their users, ordered by id.
  fn list_admins(
    &self,
    institution_id: i64,
  ) -> impl Future<Output = Result<Vec<AdminEntry>, Self::Error>> + Send + '_;

  /// Remove a role assignment. Returns `false` if it did not exist.
  fn revoke_admin(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Animals ───────────────────────────────────────────────────────────

  /// Active animals (`situation = false`) of one institution, joined with
  /// their creator and avatar, ordered by id.
  fn list_animals(
    &self,
    institution_id: i64,
  ) -> impl Future<Output = Result<Vec<AnimalWithRelations>, Self::Error>> + Send + '_;

  fn get_animal(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Animal>, Self::Error>> + Send + '_;

  /// Persist a new animal. `situation` starts as `false`.
  fn create_animal(
    &self,
    input: NewAnimal,
  ) -> impl Future<Output = Result<Animal, Self::Error>> + Send + '_;

  /// Apply the present fields of `patch`. Returns `None` if the animal does
  /// not exist.
  fn update_animal(
    &self,
    id: i64,
    patch: AnimalPatch,
  ) -> impl Future<Output = Result<Option<Animal>, Self::Error>> + Send + '_;

  /// Hard-delete an animal. Returns `false` if it did not exist.
  fn delete_animal(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
