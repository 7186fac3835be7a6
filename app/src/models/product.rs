// storefront/src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Catalog entry. Owned by catalog management; the order core only reads it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub unit_price: Decimal,
  pub is_active: bool,
  pub stock: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  pub fn new(name: impl Into<String>, unit_price: Decimal, stock: i32) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      name: name.into(),
      unit_price,
      is_active: true,
      stock,
      created_at: now,
      updated_at: now,
    }
  }
}
