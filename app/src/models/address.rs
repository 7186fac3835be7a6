// storefront/src/models/address.rs

use super::UserId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Address-book entry. Only `user_id` matters to order placement.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Address {
  pub id: Uuid,
  pub user_id: UserId,
  pub line1: String,
  pub line2: Option<String>,
  pub city: String,
  pub postal_code: String,
  pub country: String,
  pub created_at: DateTime<Utc>,
}

impl Address {
  pub fn new(
    user_id: UserId,
    line1: impl Into<String>,
    city: impl Into<String>,
    postal_code: impl Into<String>,
    country: impl Into<String>,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id,
      line1: line1.into(),
      line2: None,
      city: city.into(),
      postal_code: postal_code.into(),
      country: country.into(),
      created_at: Utc::now(),
    }
  }
}
