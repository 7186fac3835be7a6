// storefront/src/models/order.rs

use super::UserId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Paid,
  Shipped,
  Cancelled,
}

impl OrderStatus {
  /// Only a freshly placed order may start a payment.
  pub fn is_payable(self) -> bool {
    self == OrderStatus::Pending
  }
}

/// Immutable once placed; `status` is changed only by administrative action.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: UserId,
  pub status: OrderStatus,
  pub total_amount: Decimal,
  pub shipping_address_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  #[sqlx(skip)]
  pub items: Vec<OrderItem>,
}

/// Snapshot of a cart line at placement time.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  /// `None` once the product has been deleted from the catalog.
  pub product_id: Option<Uuid>,
  pub product_name: String,
  pub unit_price: Decimal,
  pub quantity: i32,
  pub line_total: Decimal,
}

impl Order {
  /// Sum of the item line totals. Equal to `total_amount` for every placed order.
  pub fn items_total(&self) -> Decimal {
    self.items.iter().map(|i| i.line_total).sum()
  }
}

/// What the order assembler hands to the store.
#[derive(Debug, Clone)]
pub struct NewOrder {
  pub id: Uuid,
  pub user_id: UserId,
  pub shipping_address_id: Uuid,
  pub total_amount: Decimal,
  pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
  pub product_id: Uuid,
  pub product_name: String,
  pub unit_price: Decimal,
  pub quantity: i32,
}

impl NewOrderItem {
  pub fn line_total(&self) -> Decimal {
    self.unit_price * Decimal::from(self.quantity)
  }
}
