// storefront/src/models/cart.rs

use super::UserId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One per user, created on first touch and never deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Cart {
  pub id: Uuid,
  pub user_id: UserId,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A line of a cart. References the product live, not by snapshot.
/// At most one per `(cart_id, product_id)`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartItem {
  pub id: Uuid,
  pub cart_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub added_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Cart line joined with the product's current data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
  pub item_id: Uuid,
  pub product_id: Uuid,
  pub product_name: String,
  pub unit_price: Decimal,
  pub quantity: i32,
  pub item_total: Decimal,
  /// Whether the line would pass the inventory check right now.
  pub available: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartView {
  pub cart_id: Uuid,
  pub user_id: UserId,
  pub items: Vec<CartLine>,
  pub total_cost: Decimal,
}

impl CartView {
  pub fn line_for_product(&self, product_id: Uuid) -> Option<&CartLine> {
    self.items.iter().find(|l| l.product_id == product_id)
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}
