//! Animals — the records institutions publish for adoption.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  media::{CAT_AVATAR_ID, DEFAULT_AVATAR_ID, DOG_AVATAR_ID, MediaAsset, MediaRef},
  policy::Tenanted,
  user::UserSummary,
};

// ─── Records ─────────────────────────────────────────────────────────────────

/// A stored animal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
  pub id:             i64,
  pub name:           String,
  pub sex:            String,
  #[serde(rename = "type")]
  pub kind:           String,
  pub detail:         String,
  /// `true` once the animal is inactive (adopted or withdrawn). Inactive
  /// animals are hidden from listings.
  pub situation:      bool,
  /// The admin who registered the animal.
  pub user_id:        i64,
  pub institution_id: i64,
  pub avatar_id:      i64,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

impl Tenanted for Animal {
  fn institution_id(&self) -> i64 { self.institution_id }
}

/// Validated descriptive fields for a new animal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalDraft {
  pub name:   String,
  pub sex:    String,
  pub kind:   String,
  pub detail: String,
}

/// Input to [`crate::store::AdoptionStore::create_animal`].
/// Timestamps and the id are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnimal {
  pub name:           String,
  pub sex:            String,
  pub kind:           String,
  pub detail:         String,
  pub user_id:        i64,
  pub institution_id: i64,
  pub avatar_id:      i64,
}

impl NewAnimal {
  /// Stamp a draft with its creator and institution, and pick the avatar.
  pub fn from_draft(draft: AnimalDraft, user_id: i64, institution_id: i64) -> Self {
    let avatar_id = avatar_for(&draft.kind);
    Self {
      name: draft.name,
      sex: draft.sex,
      kind: draft.kind,
      detail: draft.detail,
      user_id,
      institution_id,
      avatar_id,
    }
  }
}

/// A partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimalPatch {
  pub name:      Option<String>,
  pub sex:       Option<String>,
  pub kind:      Option<String>,
  pub detail:    Option<String>,
  pub situation: Option<bool>,
}

impl AnimalPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }
}

// ─── Listings ────────────────────────────────────────────────────────────────

/// An animal joined with its creator and avatar, as returned by
/// [`crate::store::AdoptionStore::list_animals`].
#[derive(Debug, Clone)]
pub struct AnimalWithRelations {
  pub animal: Animal,
  pub user:   Option<UserSummary>,
  pub avatar: Option<MediaAsset>,
}

/// The fixed public projection returned by `GET /animals/{institution_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalListing {
  pub id:     i64,
  pub name:   String,
  pub sex:    String,
  #[serde(rename = "type")]
  pub kind:   String,
  pub detail: String,
  pub user:   Option<UserSummary>,
  pub avatar: Option<MediaRef>,
}

impl AnimalWithRelations {
  pub fn into_listing(self, files_url: &str) -> AnimalListing {
    AnimalListing {
      id:     self.animal.id,
      name:   self.animal.name,
      sex:    self.animal.sex,
      kind:   self.animal.kind,
      detail: self.animal.detail,
      user:   self.user,
      avatar: self.avatar.map(|a| a.to_ref(files_url)),
    }
  }
}

// ─── Avatar rule ─────────────────────────────────────────────────────────────

/// Pick the avatar for an animal type. Keys are matched exactly, so
/// `"cachorro"` falls back to the default.
pub fn avatar_for(kind: &str) -> i64 {
  match kind {
    "Cachorro" => DOG_AVATAR_ID,
    "Gato" => CAT_AVATAR_ID,
    _ => DEFAULT_AVATAR_ID,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dog_and_cat_get_their_avatars() {
    assert_eq!(avatar_for("Cachorro"), 3);
    assert_eq!(avatar_for("Gato"), 4);
  }

  #[test]
  fn other_types_fall_back_to_default() {
    for kind in ["cachorro", "GATO", "Coelho", "", " Gato", "Cachorro "] {
      assert_eq!(avatar_for(kind), DEFAULT_AVATAR_ID, "kind: {kind:?}");
    }
  }

  #[test]
  fn from_draft_stamps_owner_and_avatar() {
    let draft = AnimalDraft {
      name:   "Mia".into(),
      sex:    "F".into(),
      kind:   "Gato".into(),
      detail: "shy".into(),
    };
    let new = NewAnimal::from_draft(draft, 7, 5);
    assert_eq!(new.user_id, 7);
    assert_eq!(new.institution_id, 5);
    assert_eq!(new.avatar_id, CAT_AVATAR_ID);
    assert_eq!(new.kind, "Gato");
  }

  #[test]
  fn animal_serialises_kind_as_type() {
    let listing = AnimalListing {
      id:     1,
      name:   "Rex".into(),
      sex:    "M".into(),
      kind:   "Cachorro".into(),
      detail: "friendly".into(),
      user:   None,
      avatar: None,
    };
    let json = serde_json::to_value(&listing).unwrap();
    assert_eq!(json["type"], "Cachorro");
    assert!(json.get("kind").is_none());
  }
}
