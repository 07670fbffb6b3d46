//! Users and the authenticated [`Actor`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user. The password hash never leaves the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:            i64,
  pub name:          String,
  pub email:         String,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Public projection of a user, embedded in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
  pub id:    i64,
  pub name:  String,
  pub email: String,
}

/// Input to [`crate::store::AdoptionStore::add_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:          String,
  pub email:         String,
  /// argon2 PHC string, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// The authenticated caller of a request.
///
/// Produced by the identity layer before any pipeline operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
  pub user_id: i64,
}
