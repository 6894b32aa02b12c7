//! The row event a mirror trigger reacts to.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Closed set of trigger kinds. Each kind has exactly one render function in
/// [`crate::render`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
  /// Copy newly inserted rows into the target.
  Insert,
  /// Copy updated rows into the target, replacing the previous copy.
  Update,
  /// Remove the mirrored row from the target.
  Delete,
}

impl TriggerKind {
  pub const ALL: [TriggerKind; 3] = [Self::Insert, Self::Update, Self::Delete];

  /// The SQL event keyword.
  pub fn as_sql(&self) -> &'static str {
    match self {
      Self::Insert => "INSERT",
      Self::Update => "UPDATE",
      Self::Delete => "DELETE",
    }
  }

  /// Lowercase name, used in generated trigger names.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Insert => "insert",
      Self::Update => "update",
      Self::Delete => "delete",
    }
  }
}

impl fmt::Display for TriggerKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for TriggerKind {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "insert" => Ok(Self::Insert),
      "update" => Ok(Self::Update),
      "delete" => Ok(Self::Delete),
      _ => Err(ValidationError::UnsupportedKind(s.to_owned())),
    }
  }
}

/// Integer codes `0..=2` in declaration order.
impl TryFrom<i64> for TriggerKind {
  type Error = ValidationError;

  fn try_from(code: i64) -> Result<Self, Self::Error> {
    match code {
      0 => Ok(Self::Insert),
      1 => Ok(Self::Update),
      2 => Ok(Self::Delete),
      other => Err(ValidationError::UnsupportedKind(other.to_string())),
    }
  }
}
