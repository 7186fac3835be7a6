// storefront/src/store/mod.rs

//! Persistence seam. Everything the order core reads or writes goes through
//! [`Store`] (read side) or a [`StoreTx`] unit of work (cart and order writes,
//! plus the catalog and address-book lookups made while deciding them).

pub mod memory;
pub mod postgres;

use crate::errors::Result as AppResult;
use crate::models::{Address, Cart, CartItem, NewOrder, Order, Product, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A unit of work shared between the steps of one pipeline run.
pub type SharedTx = Arc<tokio::sync::Mutex<Box<dyn StoreTx>>>;

#[async_trait]
pub trait Store: Send + Sync {
  async fn begin(&self) -> AppResult<Box<dyn StoreTx>>;

  /// The user's orders with their items, newest first.
  async fn list_orders(&self, user_id: UserId) -> AppResult<Vec<Order>>;

  /// `None` both when the order does not exist and when another user owns it.
  async fn find_order(&self, user_id: UserId, order_id: Uuid) -> AppResult<Option<Order>>;
}

/// One atomic unit of work. Nothing is visible to others until [`StoreTx::commit`];
/// dropping an uncommitted unit of work rolls it back.
#[async_trait]
pub trait StoreTx: Send {
  async fn product(&mut self, product_id: Uuid) -> AppResult<Option<Product>>;

  async fn address(&mut self, address_id: Uuid) -> AppResult<Option<Address>>;

  /// Gets or creates the user's cart and holds its lock until the unit of work
  /// ends, so concurrent mutations of one cart are applied one after another.
  async fn lock_cart(&mut self, user_id: UserId) -> AppResult<Cart>;

  /// Items in the order they were first added.
  async fn cart_items(&mut self, cart_id: Uuid) -> AppResult<Vec<CartItem>>;

  async fn cart_item(&mut self, cart_id: Uuid, item_id: Uuid) -> AppResult<Option<CartItem>>;

  async fn cart_item_for_product(&mut self, cart_id: Uuid, product_id: Uuid) -> AppResult<Option<CartItem>>;

  /// Inserts the line or increments an existing line for the same product.
  async fn add_cart_quantity(&mut self, cart_id: Uuid, product_id: Uuid, quantity: i32) -> AppResult<CartItem>;

  async fn set_cart_item_quantity(&mut self, cart_id: Uuid, item_id: Uuid, quantity: i32) -> AppResult<CartItem>;

  /// Returns whether a line was deleted.
  async fn delete_cart_item(&mut self, cart_id: Uuid, item_id: Uuid) -> AppResult<bool>;

  /// Returns the number of lines deleted.
  async fn clear_cart(&mut self, cart_id: Uuid) -> AppResult<u64>;

  /// Writes the order row and all of its snapshot items.
  async fn insert_order(&mut self, order: NewOrder) -> AppResult<Order>;

  async fn commit(&mut self) -> AppResult<()>;
}

pub fn share(tx: Box<dyn StoreTx>) -> SharedTx {
  Arc::new(tokio::sync::Mutex::new(tx))
}
