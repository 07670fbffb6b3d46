//! Stored media assets (avatars).
//!
//! Only a path is kept in the database; the bytes live on disk and are served
//! by whatever sits behind `files_url`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback avatar for any animal type without a dedicated picture.
pub const DEFAULT_AVATAR_ID: i64 = 1;
pub const DOG_AVATAR_ID: i64 = 3;
pub const CAT_AVATAR_ID: i64 = 4;

/// A row of the `files` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
  pub id:         i64,
  pub name:       String,
  /// Path relative to the file server root.
  pub path:       String,
  pub created_at: DateTime<Utc>,
}

impl MediaAsset {
  /// Public projection with an absolute URL under `files_url`.
  pub fn to_ref(&self, files_url: &str) -> MediaRef {
    MediaRef {
      id:   self.id,
      path: self.path.clone(),
      url:  format!("{}/{}", files_url.trim_end_matches('/'), self.path),
    }
  }
}

/// Public projection of a media asset, embedded in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
  pub id:   i64,
  pub path: String,
  pub url:  String,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn asset(path: &str) -> MediaAsset {
    MediaAsset {
      id:         3,
      name:       "dog".into(),
      path:       path.into(),
      created_at: Utc::now(),
    }
  }

  #[test]
  fn url_joins_base_and_path() {
    let r = asset("dog.png").to_ref("http://localhost:3333/files");
    assert_eq!(r.url, "http://localhost:3333/files/dog.png");
    assert_eq!(r.id, 3);
  }

  #[test]
  fn trailing_slash_on_base_is_not_doubled() {
    let r = asset("dog.png").to_ref("http://cdn.example/files/");
    assert_eq!(r.url, "http://cdn.example/files/dog.png");
  }
}
