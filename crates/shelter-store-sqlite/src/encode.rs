//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Ids are native SQLite
//! integers and need no conversion.

use chrono::{DateTime, Utc};
use shelter_core::{
  animal::{Animal, AnimalWithRelations},
  institution::{AdminEntry, Institution, RoleAssignment},
  media::MediaAsset,
  user::{User, UserSummary},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Column lists ────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

pub const INSTITUTION_COLUMNS: &str = "id, name, owner_id, created_at, updated_at";

pub const ROLE_COLUMNS: &str = "id, user_id, institution_id, created_at";

pub const ANIMAL_COLUMNS: &str = "id, name, sex, type, detail, situation, \
                                  user_id, institution_id, avatar_id, \
                                  created_at, updated_at";

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:            i64,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      name:          row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      created_at:    row.get(4)?,
      updated_at:    row.get(5)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            self.id,
      name:          self.name,
      email:         self.email,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from an `institutions` row.
pub struct RawInstitution {
  pub id:         i64,
  pub name:       String,
  pub owner_id:   i64,
  pub created_at: String,
  pub updated_at: String,
}

impl RawInstitution {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      owner_id:   row.get(2)?,
      created_at: row.get(3)?,
      updated_at: row.get(4)?,
    })
  }

  pub fn into_institution(self) -> Result<Institution> {
    Ok(Institution {
      id:         self.id,
      name:       self.name,
      owner_id:   self.owner_id,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from an `admins` row.
pub struct RawRole {
  pub id:             i64,
  pub user_id:        i64,
  pub institution_id: i64,
  pub created_at:     String,
}

impl RawRole {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      user_id:        row.get(1)?,
      institution_id: row.get(2)?,
      created_at:     row.get(3)?,
    })
  }

  pub fn into_role(self) -> Result<RoleAssignment> {
    Ok(RoleAssignment {
      id:             self.id,
      user_id:        self.user_id,
      institution_id: self.institution_id,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// An `admins` row joined with the user holding it.
pub struct RawAdminEntry {
  pub role:       RawRole,
  pub user_name:  String,
  pub user_email: String,
}

impl RawAdminEntry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      role:       RawRole::from_row(row)?,
      user_name:  row.get(4)?,
      user_email: row.get(5)?,
    })
  }

  pub fn into_entry(self) -> Result<AdminEntry> {
    let role = self.role.into_role()?;
    Ok(AdminEntry {
      id:             role.id,
      institution_id: role.institution_id,
      created_at:     role.created_at,
      user:           UserSummary {
        id:    role.user_id,
        name:  self.user_name,
        email: self.user_email,
      },
    })
  }
}

/// Raw values read directly from an `animals` row.
pub struct RawAnimal {
  pub id:             i64,
  pub name:           String,
  pub sex:            String,
  pub kind:           String,
  pub detail:         String,
  pub situation:      bool,
  pub user_id:        i64,
  pub institution_id: i64,
  pub avatar_id:      i64,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawAnimal {
  /// Read the eleven [`ANIMAL_COLUMNS`] starting at column `at`.
  pub fn from_row_at(row: &rusqlite::Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(at)?,
      name:           row.get(at + 1)?,
      sex:            row.get(at + 2)?,
      kind:           row.get(at + 3)?,
      detail:         row.get(at + 4)?,
      situation:      row.get(at + 5)?,
      user_id:        row.get(at + 6)?,
      institution_id: row.get(at + 7)?,
      avatar_id:      row.get(at + 8)?,
      created_at:     row.get(at + 9)?,
      updated_at:     row.get(at + 10)?,
    })
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Self::from_row_at(row, 0)
  }

  pub fn into_animal(self) -> Result<Animal> {
    Ok(Animal {
      id:             self.id,
      name:           self.name,
      sex:            self.sex,
      kind:           self.kind,
      detail:         self.detail,
      situation:      self.situation,
      user_id:        self.user_id,
      institution_id: self.institution_id,
      avatar_id:      self.avatar_id,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

/// An `animals` row left-joined with its creator and avatar.
pub struct RawAnimalListing {
  pub animal:     RawAnimal,
  // users join
  pub user_id:    Option<i64>,
  pub user_name:  Option<String>,
  pub user_email: Option<String>,
  // files join
  pub file_id:    Option<i64>,
  pub file_name:  Option<String>,
  pub file_path:  Option<String>,
  pub file_at:    Option<String>,
}

impl RawAnimalListing {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      animal:     RawAnimal::from_row_at(row, 0)?,
      user_id:    row.get(11)?,
      user_name:  row.get(12)?,
      user_email: row.get(13)?,
      file_id:    row.get(14)?,
      file_name:  row.get(15)?,
      file_path:  row.get(16)?,
      file_at:    row.get(17)?,
    })
  }

  pub fn into_relations(self) -> Result<AnimalWithRelations> {
    let user = match (self.user_id, self.user_name, self.user_email) {
      (Some(id), Some(name), Some(email)) => Some(UserSummary { id, name, email }),
      _ => None,
    };

    let avatar = match (self.file_id, self.file_name, self.file_path, self.file_at) {
      (Some(id), Some(name), Some(path), Some(at)) => Some(MediaAsset {
        id,
        name,
        path,
        created_at: decode_dt(&at)?,
      }),
      _ => None,
    };

    Ok(AnimalWithRelations {
      animal: self.animal.into_animal()?,
      user,
      avatar,
    })
  }
}
