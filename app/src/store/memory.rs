// storefront/src/store/memory.rs

//! In-process store. A unit of work holds the store-wide lock for its whole
//! lifetime and mutates a private copy of the state, which `commit` publishes.

use super::{Store, StoreTx};
use crate::errors::{AppError, Result as AppResult};
use crate::models::{Address, Cart, CartItem, NewOrder, Order, OrderItem, OrderStatus, Product, UserId};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
struct MemoryState {
  products: HashMap<Uuid, Product>,
  addresses: HashMap<Uuid, Address>,
  carts: HashMap<UserId, Cart>,
  // Insertion order doubles as "first added" order.
  cart_items: Vec<CartItem>,
  // Insertion order doubles as placement order.
  orders: Vec<Order>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts or replaces a catalog entry.
  pub async fn put_product(&self, product: Product) {
    self.state.lock().await.products.insert(product.id, product);
  }

  pub async fn put_address(&self, address: Address) {
    self.state.lock().await.addresses.insert(address.id, address);
  }

  pub async fn product(&self, product_id: Uuid) -> Option<Product> {
    self.state.lock().await.products.get(&product_id).cloned()
  }

  /// Administrative status change; returns false when the order is unknown.
  pub async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> bool {
    let mut state = self.state.lock().await;
    match state.orders.iter_mut().find(|o| o.id == order_id) {
      Some(order) => {
        order.status = status;
        order.updated_at = Utc::now();
        true
      }
      None => false,
    }
  }

  pub async fn order_count(&self) -> usize {
    self.state.lock().await.orders.len()
  }

  pub async fn cart_count(&self) -> usize {
    self.state.lock().await.carts.len()
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
    let guard = Arc::clone(&self.state).lock_owned().await;
    let work = guard.clone();
    Ok(Box::new(MemoryStoreTx {
      guard,
      work: Some(work),
    }))
  }

  async fn list_orders(&self, user_id: UserId) -> AppResult<Vec<Order>> {
    let state = self.state.lock().await;
    Ok(state.orders.iter().rev().filter(|o| o.user_id == user_id).cloned().collect())
  }

  async fn find_order(&self, user_id: UserId, order_id: Uuid) -> AppResult<Option<Order>> {
    let state = self.state.lock().await;
    Ok(state.orders.iter().find(|o| o.id == order_id && o.user_id == user_id).cloned())
  }
}

pub struct MemoryStoreTx {
  guard: OwnedMutexGuard<MemoryState>,
  work: Option<MemoryState>,
}

impl MemoryStoreTx {
  fn state(&mut self) -> AppResult<&mut MemoryState> {
    self
      .work
      .as_mut()
      .ok_or_else(|| AppError::Internal("unit of work used after commit".to_string()))
  }
}

#[async_trait]
impl StoreTx for MemoryStoreTx {
  async fn product(&mut self, product_id: Uuid) -> AppResult<Option<Product>> {
    Ok(self.state()?.products.get(&product_id).cloned())
  }

  async fn address(&mut self, address_id: Uuid) -> AppResult<Option<Address>> {
    Ok(self.state()?.addresses.get(&address_id).cloned())
  }

  async fn lock_cart(&mut self, user_id: UserId) -> AppResult<Cart> {
    let state = self.state()?;
    let cart = state.carts.entry(user_id).or_insert_with(|| {
      let now = Utc::now();
      Cart {
        id: Uuid::new_v4(),
        user_id,
        created_at: now,
        updated_at: now,
      }
    });
    Ok(cart.clone())
  }

  async fn cart_items(&mut self, cart_id: Uuid) -> AppResult<Vec<CartItem>> {
    let state = self.state()?;
    Ok(state.cart_items.iter().filter(|i| i.cart_id == cart_id).cloned().collect())
  }

  async fn cart_item(&mut self, cart_id: Uuid, item_id: Uuid) -> AppResult<Option<CartItem>> {
    let state = self.state()?;
    Ok(state.cart_items.iter().find(|i| i.id == item_id && i.cart_id == cart_id).cloned())
  }

  async fn cart_item_for_product(&mut self, cart_id: Uuid, product_id: Uuid) -> AppResult<Option<CartItem>> {
    let state = self.state()?;
    Ok(
      state
        .cart_items
        .iter()
        .find(|i| i.cart_id == cart_id && i.product_id == product_id)
        .cloned(),
    )
  }

  async fn add_cart_quantity(&mut self, cart_id: Uuid, product_id: Uuid, quantity: i32) -> AppResult<CartItem> {
    let state = self.state()?;
    let now = Utc::now();
    if let Some(item) = state
      .cart_items
      .iter_mut()
      .find(|i| i.cart_id == cart_id && i.product_id == product_id)
    {
      item.quantity = item
        .quantity
        .checked_add(quantity)
        .ok_or_else(|| AppError::Validation("Quantity is too large.".to_string()))?;
      item.updated_at = now;
      return Ok(item.clone());
    }
    let item = CartItem {
      id: Uuid::new_v4(),
      cart_id,
      product_id,
      quantity,
      added_at: now,
      updated_at: now,
    };
    state.cart_items.push(item.clone());
    Ok(item)
  }

  async fn set_cart_item_quantity(&mut self, cart_id: Uuid, item_id: Uuid, quantity: i32) -> AppResult<CartItem> {
    let state = self.state()?;
    let item = state
      .cart_items
      .iter_mut()
      .find(|i| i.id == item_id && i.cart_id == cart_id)
      .ok_or_else(|| AppError::NotFound(format!("Cart item {} not found", item_id)))?;
    item.quantity = quantity;
    item.updated_at = Utc::now();
    Ok(item.clone())
  }

  async fn delete_cart_item(&mut self, cart_id: Uuid, item_id: Uuid) -> AppResult<bool> {
    let state = self.state()?;
    let before = state.cart_items.len();
    state.cart_items.retain(|i| !(i.id == item_id && i.cart_id == cart_id));
    Ok(state.cart_items.len() < before)
  }

  async fn clear_cart(&mut self, cart_id: Uuid) -> AppResult<u64> {
    let state = self.state()?;
    let before = state.cart_items.len();
    state.cart_items.retain(|i| i.cart_id != cart_id);
    Ok((before - state.cart_items.len()) as u64)
  }

  async fn insert_order(&mut self, order: NewOrder) -> AppResult<Order> {
    let state = self.state()?;
    let now = Utc::now();
    let items = order
      .items
      .iter()
      .map(|item| OrderItem {
        id: Uuid::new_v4(),
        order_id: order.id,
        product_id: Some(item.product_id),
        product_name: item.product_name.clone(),
        unit_price: item.unit_price,
        quantity: item.quantity,
        line_total: item.line_total(),
      })
      .collect();
    let created = Order {
      id: order.id,
      user_id: order.user_id,
      status: OrderStatus::Pending,
      total_amount: order.total_amount,
      shipping_address_id: order.shipping_address_id,
      created_at: now,
      updated_at: now,
      items,
    };
    state.orders.push(created.clone());
    Ok(created)
  }

  async fn commit(&mut self) -> AppResult<()> {
    let work = self
      .work
      .take()
      .ok_or_else(|| AppError::Internal("unit of work committed twice".to_string()))?;
    *self.guard = work;
    Ok(())
  }
}
