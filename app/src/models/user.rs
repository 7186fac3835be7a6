// storefront/src/models/user.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of the authenticated caller. Accounts live in an external
/// identity service; the order core only ever sees this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
  pub fn new_random() -> Self {
    UserId(Uuid::new_v4())
  }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

impl From<Uuid> for UserId {
  fn from(id: Uuid) -> Self {
    UserId(id)
  }
}
