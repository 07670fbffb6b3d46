//! Request contracts and the validation gate.
//!
//! Bodies deserialize leniently (every field optional) so that a missing
//! field surfaces as a [`Error::Validation`] naming it rather than as a
//! generic decode failure. Wrongly-typed fields are rejected at decode time,
//! and so is any payload that is not a JSON object.

use std::fmt;

use serde::{
  Deserialize, Deserializer,
  de::{MapAccess, Visitor, value::MapAccessDeserializer},
};

use crate::{
  Error, Result,
  animal::{AnimalDraft, AnimalPatch},
};

/// Converts an unchecked request body into its validated form.
pub trait Validate {
  type Valid;

  fn validate(self) -> Result<Self::Valid>;
}

/// Implement `Deserialize` for a body declared with
/// `#[serde(remote = "Self")]` so that only a map is accepted. Serde's derive
/// alone would also fill the fields positionally from a sequence.
macro_rules! object_body {
  ($ty:ident) => {
    impl<'de> Deserialize<'de> for $ty {
      fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
      where
        D: Deserializer<'de>,
      {
        struct ObjectVisitor;

        impl<'de> Visitor<'de> for ObjectVisitor {
          type Value = $ty;

          fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a JSON object")
          }

          fn visit_map<A>(self, map: A) -> Result<$ty, A::Error>
          where
            A: MapAccess<'de>,
          {
            $ty::deserialize(MapAccessDeserializer::new(map))
          }
        }

        deserializer.deserialize_map(ObjectVisitor)
      }
    }
  };
}

/// A present key must carry a value; `null` is not the same as omitting it.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  T::deserialize(deserializer).map(Some)
}

fn required(field: &'static str, value: Option<String>) -> Result<String> {
  match value {
    Some(v) if !v.is_empty() => Ok(v),
    _ => Err(Error::Validation(format!("{field} is required"))),
  }
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// Body of `POST /animals`. Every field is required and non-empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(remote = "Self")]
pub struct CreateAnimalBody {
  pub name:   Option<String>,
  pub sex:    Option<String>,
  #[serde(rename = "type")]
  pub kind:   Option<String>,
  pub detail: Option<String>,
}

object_body!(CreateAnimalBody);

impl Validate for CreateAnimalBody {
  type Valid = AnimalDraft;

  fn validate(self) -> Result<AnimalDraft> {
    Ok(AnimalDraft {
      name:   required("name", self.name)?,
      sex:    required("sex", self.sex)?,
      kind:   required("type", self.kind)?,
      detail: required("detail", self.detail)?,
    })
  }
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Body of `PUT /animals/{id}`. Every field is optional but, when present,
/// must not be `null`; unknown keys are ignored and never applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(remote = "Self")]
pub struct UpdateAnimalBody {
  #[serde(default, deserialize_with = "present")]
  pub name:      Option<String>,
  #[serde(default, deserialize_with = "present")]
  pub sex:       Option<String>,
  #[serde(rename = "type", default, deserialize_with = "present")]
  pub kind:      Option<String>,
  #[serde(default, deserialize_with = "present")]
  pub detail:    Option<String>,
  #[serde(default, deserialize_with = "present")]
  pub situation: Option<bool>,
}

object_body!(UpdateAnimalBody);

impl Validate for UpdateAnimalBody {
  type Valid = AnimalPatch;

  fn validate(self) -> Result<AnimalPatch> {
    Ok(AnimalPatch {
      name:      self.name,
      sex:       self.sex,
      kind:      self.kind,
      detail:    self.detail,
      situation: self.situation,
    })
  }
}

// ─── Admins ──────────────────────────────────────────────────────────────────

/// Body of `POST /admins`: the email of the user to promote.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(remote = "Self")]
pub struct GrantAdminBody {
  pub email: Option<String>,
}

object_body!(GrantAdminBody);

impl Validate for GrantAdminBody {
  type Valid = String;

  fn validate(self) -> Result<String> { required("email", self.email) }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn create(v: serde_json::Value) -> Result<AnimalDraft> {
    serde_json::from_value::<CreateAnimalBody>(v).unwrap().validate()
  }

  #[test]
  fn complete_create_body_passes() {
    let draft = create(json!({
      "name": "Rex", "sex": "M", "type": "Cachorro", "detail": "friendly"
    }))
    .unwrap();
    assert_eq!(draft.kind, "Cachorro");
    assert_eq!(draft.detail, "friendly");
  }

  #[test]
  fn each_missing_field_is_rejected() {
    let full = json!({
      "name": "Rex", "sex": "M", "type": "Cachorro", "detail": "friendly"
    });
    for field in ["name", "sex", "type", "detail"] {
      let mut body = full.clone();
      body.as_object_mut().unwrap().remove(field);
      match create(body) {
        Err(Error::Validation(msg)) => assert!(msg.contains(field), "{msg}"),
        other => panic!("expected validation error for {field}, got {other:?}"),
      }
    }
  }

  #[test]
  fn empty_string_counts_as_missing() {
    let err = create(json!({
      "name": "", "sex": "M", "type": "Gato", "detail": "x"
    }))
    .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }

  #[test]
  fn wrong_type_fails_to_decode() {
    let res = serde_json::from_value::<CreateAnimalBody>(json!({
      "name": 5, "sex": "M", "type": "Gato", "detail": "x"
    }));
    assert!(res.is_err());
  }

  #[test]
  fn array_body_is_rejected() {
    let res = serde_json::from_value::<CreateAnimalBody>(json!([
      "Rex", "M", "Cachorro", "friendly"
    ]));
    assert!(res.is_err());

    let res = serde_json::from_value::<UpdateAnimalBody>(json!(["Rex"]));
    assert!(res.is_err());

    let res = serde_json::from_value::<GrantAdminBody>(json!(["a@b.c"]));
    assert!(res.is_err());
  }

  #[test]
  fn scalar_body_is_rejected() {
    assert!(serde_json::from_value::<CreateAnimalBody>(json!("Rex")).is_err());
    assert!(serde_json::from_value::<UpdateAnimalBody>(json!(null)).is_err());
  }

  #[test]
  fn explicit_null_in_update_is_rejected() {
    for field in ["name", "sex", "type", "detail", "situation"] {
      let res = serde_json::from_value::<UpdateAnimalBody>(json!({ field: null }));
      assert!(res.is_err(), "null {field} should not decode");
    }
  }

  #[test]
  fn grant_requires_email() {
    let body = serde_json::from_value::<GrantAdminBody>(json!({})).unwrap();
    assert!(matches!(body.validate(), Err(Error::Validation(_))));

    let body = serde_json::from_value::<GrantAdminBody>(json!({ "email": "a@b.c" })).unwrap();
    assert_eq!(body.validate().unwrap(), "a@b.c");
  }

  #[test]
  fn update_keeps_only_present_fields() {
    let patch = serde_json::from_value::<UpdateAnimalBody>(json!({
      "detail": "vaccinated",
      "institution_id": 99
    }))
    .unwrap()
    .validate()
    .unwrap();
    assert_eq!(patch.detail.as_deref(), Some("vaccinated"));
    assert!(patch.name.is_none());
    assert!(patch.situation.is_none());
  }

  #[test]
  fn empty_update_is_valid() {
    let patch = UpdateAnimalBody::default().validate().unwrap();
    assert!(patch.is_empty());
  }
}
