//! Pipeline tests against an in-memory store that counts its calls.

use std::{
  convert::Infallible,
  sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  },
};

use chrono::Utc;

use super::*;
use crate::{
  animal::{AnimalPatch, AnimalWithRelations},
  institution::{Institution, NewInstitution},
  user::{NewUser, User, UserSummary},
};

#[derive(Default)]
struct Inner {
  users:        Vec<User>,
  institutions: Vec<Institution>,
  roles:        Vec<RoleAssignment>,
  animals:      Vec<Animal>,
}

#[derive(Default)]
struct MemoryStore {
  inner: Mutex<Inner>,
  calls: AtomicUsize,
}

impl MemoryStore {
  fn touch(&self) { self.calls.fetch_add(1, Ordering::SeqCst); }

  fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

  fn with_institutions(n: i64) -> Self {
    let store = Self::default();
    {
      let mut inner = store.inner.lock().unwrap();
      for id in 1..=n {
        inner.institutions.push(Institution {
          id,
          name: format!("Institution {id}"),
          owner_id: 1,
          created_at: Utc::now(),
          updated_at: Utc::now(),
        });
      }
    }
    store
  }

  fn user(&self, id: i64) {
    let mut inner = self.inner.lock().unwrap();
    inner.users.push(User {
      id,
      name: format!("User {id}"),
      email: format!("user{id}@example.com"),
      password_hash: String::new(),
      created_at: Utc::now(),
      updated_at: Utc::now(),
    });
  }

  fn admin(&self, user_id: i64, institution_id: i64) -> RoleAssignment {
    let mut inner = self.inner.lock().unwrap();
    let id = inner.roles.iter().map(|r| r.id).max().unwrap_or(0) + 1;
    let role = RoleAssignment {
      id,
      user_id,
      institution_id,
      created_at: Utc::now(),
    };
    inner.roles.push(role.clone());
    role
  }

  fn role_count(&self) -> usize { self.inner.lock().unwrap().roles.len() }

  fn animal_count(&self) -> usize { self.inner.lock().unwrap().animals.len() }
}

impl AdoptionStore for MemoryStore {
  type Error = Infallible;

  async fn add_user(&self, _: NewUser) -> Result<User, Infallible> {
    unimplemented!()
  }

  async fn get_user(&self, _: i64) -> Result<Option<User>, Infallible> {
    unimplemented!()
  }

  async fn find_user_by_email<'a>(&'a self, email: &'a str) -> Result<Option<User>, Infallible> {
    self.touch();
    let inner = self.inner.lock().unwrap();
    Ok(inner.users.iter().find(|u| u.email == email).cloned())
  }

  async fn add_institution(&self, _: NewInstitution) -> Result<Institution, Infallible> {
    unimplemented!()
  }

  async fn get_institution(&self, id: i64) -> Result<Option<Institution>, Infallible> {
    self.touch();
    let inner = self.inner.lock().unwrap();
    Ok(inner.institutions.iter().find(|i| i.id == id).cloned())
  }

  async fn list_institutions(&self) -> Result<Vec<Institution>, Infallible> {
    self.touch();
    Ok(self.inner.lock().unwrap().institutions.clone())
  }

  async fn grant_admin(
    &self,
    user_id: i64,
    institution_id: i64,
  ) -> Result<RoleAssignment, Infallible> {
    self.touch();
    Ok(self.admin(user_id, institution_id))
  }

  async fn find_role(&self, user_id: i64) -> Result<Option<RoleAssignment>, Infallible> {
    self.touch();
    let inner = self.inner.lock().unwrap();
    Ok(inner.roles.iter().find(|r| r.user_id == user_id).cloned())
  }

  async fn get_role(&self, id: i64) -> Result<Option<RoleAssignment>, Infallible> {
    self.touch();
    let inner = self.inner.lock().unwrap();
    Ok(inner.roles.iter().find(|r| r.id == id).cloned())
  }

  async fn list_admins(&self, institution_id: i64) -> Result<Vec<AdminEntry>, Infallible> {
    self.touch();
    let inner = self.inner.lock().unwrap();
    Ok(
      inner
        .roles
        .iter()
        .filter(|r| r.institution_id == institution_id)
        .filter_map(|r| {
          let user = inner.users.iter().find(|u| u.id == r.user_id)?;
          Some(AdminEntry {
            id:             r.id,
            institution_id: r.institution_id,
            created_at:     r.created_at,
            user:           UserSummary {
              id:    user.id,
              name:  user.name.clone(),
              email: user.email.clone(),
            },
          })
        })
        .collect(),
    )
  }

  async fn revoke_admin(&self, id: i64) -> Result<bool, Infallible> {
    self.touch();
    let mut inner = self.inner.lock().unwrap();
    let before = inner.roles.len();
    inner.roles.retain(|r| r.id != id);
    Ok(inner.roles.len() != before)
  }

  async fn list_animals(
    &self,
    institution_id: i64,
  ) -> Result<Vec<AnimalWithRelations>, Infallible> {
    self.touch();
    let inner = self.inner.lock().unwrap();
    Ok(
      inner
        .animals
        .iter()
        .filter(|a| a.institution_id == institution_id && !a.situation)
        .map(|a| AnimalWithRelations {
          animal: a.clone(),
          user:   None,
          avatar: None,
        })
        .collect(),
    )
  }

  async fn get_animal(&self, id: i64) -> Result<Option<Animal>, Infallible> {
    self.touch();
    let inner = self.inner.lock().unwrap();
    Ok(inner.animals.iter().find(|a| a.id == id).cloned())
  }

  async fn create_animal(&self, input: NewAnimal) -> Result<Animal, Infallible> {
    self.touch();
    let mut inner = self.inner.lock().unwrap();
    let now = Utc::now();
    let animal = Animal {
      id: inner.animals.iter().map(|a| a.id).max().unwrap_or(0) + 1,
      name: input.name,
      sex: input.sex,
      kind: input.kind,
      detail: input.detail,
      situation: false,
      user_id: input.user_id,
      institution_id: input.institution_id,
      avatar_id: input.avatar_id,
      created_at: now,
      updated_at: now,
    };
    inner.animals.push(animal.clone());
    Ok(animal)
  }

  async fn update_animal(
    &self,
    id: i64,
    patch: AnimalPatch,
  ) -> Result<Option<Animal>, Infallible> {
    self.touch();
    let mut inner = self.inner.lock().unwrap();
    let Some(animal) = inner.animals.iter_mut().find(|a| a.id == id) else {
      return Ok(None);
    };
    if let Some(v) = patch.name {
      animal.name = v;
    }
    if let Some(v) = patch.sex {
      animal.sex = v;
    }
    if let Some(v) = patch.kind {
      animal.kind = v;
    }
    if let Some(v) = patch.detail {
      animal.detail = v;
    }
    if let Some(v) = patch.situation {
      animal.situation = v;
    }
    animal.updated_at = Utc::now();
    Ok(Some(animal.clone()))
  }

  async fn delete_animal(&self, id: i64) -> Result<bool, Infallible> {
    self.touch();
    let mut inner = self.inner.lock().unwrap();
    let before = inner.animals.len();
    inner.animals.retain(|a| a.id != id);
    Ok(inner.animals.len() != before)
  }
}

fn rex() -> CreateAnimalBody {
  CreateAnimalBody {
    name:   Some("Rex".into()),
    sex:    Some("M".into()),
    kind:   Some("Cachorro".into()),
    detail: Some("friendly".into()),
  }
}

const ADMIN: Actor = Actor { user_id: 10 };
const OTHER_ADMIN: Actor = Actor { user_id: 20 };
const PLAIN: Actor = Actor { user_id: 30 };

fn store() -> MemoryStore {
  let s = MemoryStore::with_institutions(6);
  for actor in [ADMIN, OTHER_ADMIN, PLAIN] {
    s.user(actor.user_id);
  }
  s.admin(ADMIN.user_id, 5);
  s.admin(OTHER_ADMIN.user_id, 6);
  s
}

fn grant(email: &str) -> GrantAdminBody {
  GrantAdminBody {
    email: Some(email.into()),
  }
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_stamps_actor_institution_and_avatar() {
  let s = store();
  let animal = create_animal(&s, ADMIN, rex()).await.unwrap();
  assert_eq!(animal.institution_id, 5);
  assert_eq!(animal.avatar_id, 3);
  assert_eq!(animal.user_id, ADMIN.user_id);
  assert!(!animal.situation);
}

#[tokio::test]
async fn invalid_create_touches_nothing() {
  let s = store();
  let mut body = rex();
  body.detail = None;

  let err = create_animal(&s, ADMIN, body).await.unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
  assert_eq!(s.calls(), 0, "validation must run before any store access");
  assert_eq!(s.animal_count(), 0);
}

#[tokio::test]
async fn create_without_role_is_unauthorized() {
  let s = store();
  let err = create_animal(&s, PLAIN, rex()).await.unwrap_err();
  assert!(matches!(err, Error::Unauthorized(_)));
  assert_eq!(s.animal_count(), 0);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_applies_only_present_fields() {
  let s = store();
  let animal = create_animal(&s, ADMIN, rex()).await.unwrap();

  let body = UpdateAnimalBody {
    detail: Some("vaccinated".into()),
    ..Default::default()
  };
  let updated = update_animal(&s, ADMIN, animal.id, body).await.unwrap();

  assert_eq!(updated.detail, "vaccinated");
  assert_eq!(updated.name, animal.name);
  assert_eq!(updated.sex, animal.sex);
  assert_eq!(updated.kind, animal.kind);
  assert_eq!(updated.avatar_id, animal.avatar_id);
}

#[tokio::test]
async fn update_from_other_institution_is_denied() {
  let s = store();
  let animal = create_animal(&s, ADMIN, rex()).await.unwrap();

  let body = UpdateAnimalBody {
    name: Some("Stolen".into()),
    ..Default::default()
  };
  let err = update_animal(&s, OTHER_ADMIN, animal.id, body).await.unwrap_err();
  assert!(matches!(err, Error::Unauthorized(_)));

  let stored = s.get_animal(animal.id).await.unwrap().unwrap();
  assert_eq!(stored.name, "Rex");
}

#[tokio::test]
async fn update_missing_animal_is_not_found() {
  let s = store();
  let err = update_animal(&s, ADMIN, 404, UpdateAnimalBody::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn update_by_plain_user_checks_role_before_lookup() {
  let s = store();
  let err = update_animal(&s, PLAIN, 404, UpdateAnimalBody::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Unauthorized(_)));
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_animal_and_confirms() {
  let s = store();
  let animal = create_animal(&s, ADMIN, rex()).await.unwrap();

  let done = delete_animal(&s, ADMIN, animal.id).await.unwrap();
  assert!(done.message.contains("deleted"));
  assert_eq!(s.animal_count(), 0);
}

#[tokio::test]
async fn delete_missing_is_not_found_even_for_plain_users() {
  let s = store();
  let err = delete_animal(&s, PLAIN, 404).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(ref m) if m.contains("not found")));
}

#[tokio::test]
async fn delete_from_other_institution_is_denied() {
  let s = store();
  let animal = create_animal(&s, ADMIN, rex()).await.unwrap();

  for actor in [OTHER_ADMIN, PLAIN] {
    let err = delete_animal(&s, actor, animal.id).await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));
  }
  assert_eq!(s.animal_count(), 1);
}

// ─── List ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_hides_inactive_and_other_institutions() {
  let s = store();
  let kept = create_animal(&s, ADMIN, rex()).await.unwrap();
  let hidden = create_animal(&s, ADMIN, rex()).await.unwrap();
  create_animal(&s, OTHER_ADMIN, rex()).await.unwrap();

  let body = UpdateAnimalBody {
    situation: Some(true),
    ..Default::default()
  };
  update_animal(&s, ADMIN, hidden.id, body).await.unwrap();

  let listed = list_animals(&s, 5, "http://files").await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].id, kept.id);
}

// ─── Admin status ────────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_status_reflects_role_institution() {
  let s = store();
  assert!(is_admin_of(&s, ADMIN, 5).await.unwrap().admin);
  assert!(!is_admin_of(&s, ADMIN, 6).await.unwrap().admin);
  assert!(!is_admin_of(&s, PLAIN, 5).await.unwrap().admin);
}

#[tokio::test]
async fn admin_status_for_missing_institution_is_not_found() {
  let s = store();
  let err = is_admin_of(&s, ADMIN, 99).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}

// ─── Institutions ────────────────────────────────────────────────────────────

#[tokio::test]
async fn institutions_are_listed_and_shown() {
  let s = store();
  assert_eq!(list_institutions(&s).await.unwrap().len(), 6);
  assert_eq!(show_institution(&s, 5).await.unwrap().id, 5);
  assert!(matches!(
    show_institution(&s, 99).await,
    Err(Error::NotFound(_))
  ));
}

// ─── Admins ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn admins_are_scoped_to_the_callers_institution() {
  let s = store();
  let listed = list_admins(&s, ADMIN).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].user.id, ADMIN.user_id);
  assert_eq!(listed[0].institution_id, 5);

  assert!(matches!(
    list_admins(&s, PLAIN).await,
    Err(Error::Unauthorized(_))
  ));
}

#[tokio::test]
async fn grant_promotes_into_callers_institution() {
  let s = store();
  let role = grant_admin(&s, ADMIN, grant("user30@example.com"))
    .await
    .unwrap();
  assert_eq!(role.user_id, PLAIN.user_id);
  assert_eq!(role.institution_id, 5);
  assert!(is_admin_of(&s, PLAIN, 5).await.unwrap().admin);
}

#[tokio::test]
async fn invalid_grant_touches_nothing() {
  let s = store();
  let err = grant_admin(&s, ADMIN, GrantAdminBody::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
  assert_eq!(s.calls(), 0);
}

#[tokio::test]
async fn grant_rejects_plain_callers_unknown_users_and_existing_admins() {
  let s = store();

  let err = grant_admin(&s, PLAIN, grant("user30@example.com"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Unauthorized(_)));

  let err = grant_admin(&s, ADMIN, grant("nobody@example.com"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));

  let err = grant_admin(&s, ADMIN, grant("user20@example.com"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));

  assert_eq!(s.role_count(), 2);
}

#[tokio::test]
async fn revoke_removes_an_admin_of_the_same_institution() {
  let s = store();
  let role = grant_admin(&s, ADMIN, grant("user30@example.com"))
    .await
    .unwrap();

  let done = revoke_admin(&s, ADMIN, role.id).await.unwrap();
  assert!(done.message.contains("removed"));
  assert!(!is_admin_of(&s, PLAIN, 5).await.unwrap().admin);
}

#[tokio::test]
async fn revoke_from_other_institution_is_denied() {
  let s = store();
  let role = grant_admin(&s, ADMIN, grant("user30@example.com"))
    .await
    .unwrap();

  let err = revoke_admin(&s, OTHER_ADMIN, role.id).await.unwrap_err();
  assert!(matches!(err, Error::Unauthorized(_)));
  assert_eq!(s.role_count(), 3);
}

#[tokio::test]
async fn revoke_own_role_or_missing_role_fails() {
  let s = store();
  let own = s.find_role(ADMIN.user_id).await.unwrap().unwrap();

  let err = revoke_admin(&s, ADMIN, own.id).await.unwrap_err();
  assert!(matches!(err, Error::Validation(_)));

  let err = revoke_admin(&s, ADMIN, 404).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
  assert_eq!(s.role_count(), 2);
}
