//! Tenancy policy: an admin may only touch resources of their own
//! institution.

use crate::{Error, Result, institution::RoleAssignment};

/// A resource owned by exactly one institution.
pub trait Tenanted {
  fn institution_id(&self) -> i64;
}

/// Allow iff the role assignment is scoped to the target's institution.
pub fn authorize<T: Tenanted + ?Sized>(role: &RoleAssignment, target: &T) -> Result<()> {
  if role.institution_id == target.institution_id() {
    Ok(())
  } else {
    Err(Error::Unauthorized("not authorized".into()))
  }
}

/// `authorize` as a plain boolean, for read-side checks.
pub fn is_member<T: Tenanted + ?Sized>(role: &RoleAssignment, target: &T) -> bool {
  authorize(role, target).is_ok()
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  struct Owned(i64);

  impl Tenanted for Owned {
    fn institution_id(&self) -> i64 { self.0 }
  }

  fn role(institution_id: i64) -> RoleAssignment {
    RoleAssignment {
      id: 1,
      user_id: 10,
      institution_id,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn same_institution_is_allowed() {
    assert!(authorize(&role(5), &Owned(5)).is_ok());
    assert!(is_member(&role(5), &Owned(5)));
  }

  #[test]
  fn other_institution_is_denied() {
    assert!(matches!(
      authorize(&role(5), &Owned(6)),
      Err(Error::Unauthorized(_))
    ));
    assert!(!is_member(&role(5), &Owned(6)));
  }
}
