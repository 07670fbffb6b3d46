//! [`SqliteStore`] — the SQLite implementation of [`AdoptionStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use shelter_core::{
  animal::{Animal, AnimalPatch, AnimalWithRelations, NewAnimal},
  institution::{AdminEntry, Institution, NewInstitution, RoleAssignment},
  store::AdoptionStore,
  user::{NewUser, User},
};

use crate::{
  Error, Result,
  encode::{
    ANIMAL_COLUMNS, INSTITUTION_COLUMNS, ROLE_COLUMNS, RawAdminEntry, RawAnimal,
    RawAnimalListing, RawInstitution, RawRole, RawUser, USER_COLUMNS, encode_dt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An adoption store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("schema initialised");
    Ok(())
  }
}

// ─── AdoptionStore impl ──────────────────────────────────────────────────────

impl AdoptionStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let at_str = encode_dt(Utc::now());
    let email = input.email.clone();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let taken = conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![input.email],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(None);
        }

        conn.execute(
          "INSERT INTO users (name, email, password_hash, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)",
          rusqlite::params![input.name, input.email, input.password_hash, at_str],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Some(conn.query_row(
          &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
          rusqlite::params![id],
          RawUser::from_row,
        )?))
      })
      .await?;

    let user = raw.ok_or(Error::DuplicateEmail(email))?.into_user()?;
    tracing::info!(user_id = user.id, "user registered");
    Ok(user)
  }

  async fn get_user(&self, id: i64) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            rusqlite::params![id],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user_by_email<'a>(&'a self, email: &'a str) -> Result<Option<User>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            rusqlite::params![email],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Institutions & roles ──────────────────────────────────────────────────

  async fn add_institution(&self, input: NewInstitution) -> Result<Institution> {
    let at_str = encode_dt(Utc::now());

    let raw: RawInstitution = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO institutions (name, owner_id, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?3)",
          rusqlite::params![input.name, input.owner_id, at_str],
        )?;
        let id = conn.last_insert_rowid();
        Ok(conn.query_row(
          &format!("SELECT {INSTITUTION_COLUMNS} FROM institutions WHERE id = ?1"),
          rusqlite::params![id],
          RawInstitution::from_row,
        )?)
      })
      .await?;

    raw.into_institution()
  }

  async fn get_institution(&self, id: i64) -> Result<Option<Institution>> {
    let raw: Option<RawInstitution> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {INSTITUTION_COLUMNS} FROM institutions WHERE id = ?1"),
            rusqlite::params![id],
            RawInstitution::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawInstitution::into_institution).transpose()
  }

  async fn list_institutions(&self) -> Result<Vec<Institution>> {
    let raws: Vec<RawInstitution> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INSTITUTION_COLUMNS} FROM institutions ORDER BY id"
        ))?;
        let rows = stmt
          .query_map([], RawInstitution::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawInstitution::into_institution)
      .collect()
  }

  async fn grant_admin(&self, user_id: i64, institution_id: i64) -> Result<RoleAssignment> {
    let at_str = encode_dt(Utc::now());

    let raw: Option<RawRole> = self
      .conn
      .call(move |conn| {
        let held = conn
          .query_row(
            "SELECT 1 FROM admins WHERE user_id = ?1",
            rusqlite::params![user_id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if held {
          return Ok(None);
        }

        conn.execute(
          "INSERT INTO admins (user_id, institution_id, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![user_id, institution_id, at_str],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Some(conn.query_row(
          &format!("SELECT {ROLE_COLUMNS} FROM admins WHERE id = ?1"),
          rusqlite::params![id],
          RawRole::from_row,
        )?))
      })
      .await?;

    let role = raw.ok_or(Error::AlreadyAdmin(user_id))?.into_role()?;
    tracing::info!(user_id, institution_id, "admin role granted");
    Ok(role)
  }

  async fn find_role(&self, user_id: i64) -> Result<Option<RoleAssignment>> {
    let raw: Option<RawRole> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ROLE_COLUMNS} FROM admins WHERE user_id = ?1"),
            rusqlite::params![user_id],
            RawRole::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRole::into_role).transpose()
  }

  async fn get_role(&self, id: i64) -> Result<Option<RoleAssignment>> {
    let raw: Option<RawRole> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ROLE_COLUMNS} FROM admins WHERE id = ?1"),
            rusqlite::params![id],
            RawRole::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRole::into_role).transpose()
  }

  async fn list_admins(&self, institution_id: i64) -> Result<Vec<AdminEntry>> {
    let raws: Vec<RawAdminEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             a.id, a.user_id, a.institution_id, a.created_at,
             u.name, u.email
           FROM admins a
           JOIN users u ON u.id = a.user_id
           WHERE a.institution_id = ?1
           ORDER BY a.id",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![institution_id], RawAdminEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAdminEntry::into_entry).collect()
  }

  async fn revoke_admin(&self, id: i64) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM admins WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    if removed > 0 {
      tracing::info!(role_id = id, "admin role revoked");
    }
    Ok(removed > 0)
  }

  // ── Animals ───────────────────────────────────────────────────────────────

  async fn list_animals(&self, institution_id: i64) -> Result<Vec<AnimalWithRelations>> {
    let raws: Vec<RawAnimalListing> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             a.id, a.name, a.sex, a.type, a.detail, a.situation,
             a.user_id, a.institution_id, a.avatar_id,
             a.created_at, a.updated_at,
             u.id, u.name, u.email,
             f.id, f.name, f.path, f.created_at
           FROM animals a
           LEFT JOIN users u ON u.id = a.user_id
           LEFT JOIN files f ON f.id = a.avatar_id
           WHERE a.institution_id = ?1
             AND a.situation = 0
           ORDER BY a.id",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![institution_id], RawAnimalListing::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawAnimalListing::into_relations)
      .collect()
  }

  async fn get_animal(&self, id: i64) -> Result<Option<Animal>> {
    let raw: Option<RawAnimal> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ANIMAL_COLUMNS} FROM animals WHERE id = ?1"),
            rusqlite::params![id],
            RawAnimal::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAnimal::into_animal).transpose()
  }

  async fn create_animal(&self, input: NewAnimal) -> Result<Animal> {
    let at_str = encode_dt(Utc::now());

    let raw: RawAnimal = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO animals (
             name, sex, type, detail, situation,
             user_id, institution_id, avatar_id,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![
            input.name,
            input.sex,
            input.kind,
            input.detail,
            input.user_id,
            input.institution_id,
            input.avatar_id,
            at_str,
          ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(conn.query_row(
          &format!("SELECT {ANIMAL_COLUMNS} FROM animals WHERE id = ?1"),
          rusqlite::params![id],
          RawAnimal::from_row,
        )?)
      })
      .await?;

    raw.into_animal()
  }

  async fn update_animal(&self, id: i64, patch: AnimalPatch) -> Result<Option<Animal>> {
    let at_str = encode_dt(Utc::now());

    let raw: Option<RawAnimal> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE animals SET
             name       = COALESCE(?1, name),
             sex        = COALESCE(?2, sex),
             type       = COALESCE(?3, type),
             detail     = COALESCE(?4, detail),
             situation  = COALESCE(?5, situation),
             updated_at = ?6
           WHERE id = ?7",
          rusqlite::params![
            patch.name,
            patch.sex,
            patch.kind,
            patch.detail,
            patch.situation,
            at_str,
            id,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }

        Ok(conn
          .query_row(
            &format!("SELECT {ANIMAL_COLUMNS} FROM animals WHERE id = ?1"),
            rusqlite::params![id],
            RawAnimal::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAnimal::into_animal).transpose()
  }

  async fn delete_animal(&self, id: i64) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM animals WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    Ok(removed > 0)
  }
}
