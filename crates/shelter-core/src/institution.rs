//! Institutions and the admin role assignments scoped to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{policy::Tenanted, user::UserSummary};

/// A shelter or NGO that owns animals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Institution {
  pub id:         i64,
  pub name:       String,
  /// The user who registered the institution.
  pub owner_id:   i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Tenanted for Institution {
  fn institution_id(&self) -> i64 { self.id }
}

/// Input to [`crate::store::AdoptionStore::add_institution`].
#[derive(Debug, Clone)]
pub struct NewInstitution {
  pub name:     String,
  pub owner_id: i64,
}

/// Grants admin privilege over one institution to one user.
///
/// A user holds at most one assignment. Admins grant and revoke assignments
/// within their own institution; the CLI provisions the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
  pub id:             i64,
  pub user_id:        i64,
  pub institution_id: i64,
  pub created_at:     DateTime<Utc>,
}

impl Tenanted for RoleAssignment {
  fn institution_id(&self) -> i64 { self.institution_id }
}

/// A role assignment joined with the user holding it, as listed by
/// `GET /admins`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminEntry {
  pub id:             i64,
  pub institution_id: i64,
  pub created_at:     DateTime<Utc>,
  pub user:           UserSummary,
}
