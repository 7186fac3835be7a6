// storefront/src/store/postgres.rs

use super::{Store, StoreTx};
use crate::errors::{AppError, Result as AppResult};
use crate::models::{Address, Cart, CartItem, NewOrder, Order, OrderItem, OrderStatus, Product, UserId};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

const PRODUCT_COLUMNS: &str = "id, name, unit_price, is_active, stock, created_at, updated_at";
const CART_ITEM_COLUMNS: &str = "id, cart_id, product_id, quantity, added_at, updated_at";
const ORDER_COLUMNS: &str = "id, user_id, status, total_amount, shipping_address_id, created_at, updated_at";
const ORDER_ITEM_COLUMNS: &str =
  "id, order_id, product_id, product_name, unit_price, quantity, unit_price * quantity AS line_total";

#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str, max_connections: u32) -> AppResult<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await?;
    info!(max_connections, "Connected to PostgreSQL.");
    Ok(Self::new(pool))
  }

  pub async fn migrate(&self) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    info!("Database migrations applied.");
    Ok(())
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }
}

async fn attach_items(conn: &mut PgConnection, orders: &mut [Order]) -> AppResult<()> {
  if orders.is_empty() {
    return Ok(());
  }
  let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
  let items = sqlx::query_as::<_, OrderItem>(&format!(
    "SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY order_id, position"
  ))
  .bind(&ids)
  .fetch_all(&mut *conn)
  .await?;

  let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
  for item in items {
    by_order.entry(item.order_id).or_default().push(item);
  }
  for order in orders.iter_mut() {
    order.items = by_order.remove(&order.id).unwrap_or_default();
  }
  Ok(())
}

#[async_trait]
impl Store for PgStore {
  async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
    let tx = self.pool.begin().await?;
    Ok(Box::new(PgStoreTx { tx: Some(tx) }))
  }

  #[instrument(name = "PgStore::list_orders", skip(self), err)]
  async fn list_orders(&self, user_id: UserId) -> AppResult<Vec<Order>> {
    let mut conn = self.pool.acquire().await?;
    let mut orders = sqlx::query_as::<_, Order>(&format!(
      "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;
    attach_items(&mut conn, &mut orders).await?;
    Ok(orders)
  }

  #[instrument(name = "PgStore::find_order", skip(self), err)]
  async fn find_order(&self, user_id: UserId, order_id: Uuid) -> AppResult<Option<Order>> {
    let mut conn = self.pool.acquire().await?;
    let order = sqlx::query_as::<_, Order>(&format!(
      "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
    ))
    .bind(order_id)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;
    let Some(order) = order else {
      return Ok(None);
    };
    let mut orders = [order];
    attach_items(&mut conn, &mut orders).await?;
    let [order] = orders;
    Ok(Some(order))
  }
}

pub struct PgStoreTx {
  tx: Option<Transaction<'static, Postgres>>,
}

impl PgStoreTx {
  fn conn(&mut self) -> AppResult<&mut PgConnection> {
    self
      .tx
      .as_deref_mut()
      .ok_or_else(|| AppError::Internal("unit of work used after commit".to_string()))
  }
}

#[async_trait]
impl StoreTx for PgStoreTx {
  async fn product(&mut self, product_id: Uuid) -> AppResult<Option<Product>> {
    // FOR SHARE keeps the row stable until the unit of work ends.
    let product = sqlx::query_as::<_, Product>(&format!(
      "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 FOR SHARE"
    ))
    .bind(product_id)
    .fetch_optional(self.conn()?)
    .await?;
    Ok(product)
  }

  async fn address(&mut self, address_id: Uuid) -> AppResult<Option<Address>> {
    let address = sqlx::query_as::<_, Address>(
      "SELECT id, user_id, line1, line2, city, postal_code, country, created_at FROM addresses WHERE id = $1",
    )
    .bind(address_id)
    .fetch_optional(self.conn()?)
    .await?;
    Ok(address)
  }

  async fn lock_cart(&mut self, user_id: UserId) -> AppResult<Cart> {
    let conn = self.conn()?;
    sqlx::query("INSERT INTO carts (id, user_id) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING")
      .bind(Uuid::new_v4())
      .bind(user_id)
      .execute(&mut *conn)
      .await?;
    let cart = sqlx::query_as::<_, Cart>(
      "SELECT id, user_id, created_at, updated_at FROM carts WHERE user_id = $1 FOR UPDATE",
    )
    .bind(user_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(cart)
  }

  async fn cart_items(&mut self, cart_id: Uuid) -> AppResult<Vec<CartItem>> {
    let items = sqlx::query_as::<_, CartItem>(&format!(
      "SELECT {CART_ITEM_COLUMNS} FROM cart_items WHERE cart_id = $1 ORDER BY added_at, id"
    ))
    .bind(cart_id)
    .fetch_all(self.conn()?)
    .await?;
    Ok(items)
  }

  async fn cart_item(&mut self, cart_id: Uuid, item_id: Uuid) -> AppResult<Option<CartItem>> {
    let item = sqlx::query_as::<_, CartItem>(&format!(
      "SELECT {CART_ITEM_COLUMNS} FROM cart_items WHERE id = $1 AND cart_id = $2"
    ))
    .bind(item_id)
    .bind(cart_id)
    .fetch_optional(self.conn()?)
    .await?;
    Ok(item)
  }

  async fn cart_item_for_product(&mut self, cart_id: Uuid, product_id: Uuid) -> AppResult<Option<CartItem>> {
    let item = sqlx::query_as::<_, CartItem>(&format!(
      "SELECT {CART_ITEM_COLUMNS} FROM cart_items WHERE cart_id = $1 AND product_id = $2"
    ))
    .bind(cart_id)
    .bind(product_id)
    .fetch_optional(self.conn()?)
    .await?;
    Ok(item)
  }

  async fn add_cart_quantity(&mut self, cart_id: Uuid, product_id: Uuid, quantity: i32) -> AppResult<CartItem> {
    let item = sqlx::query_as::<_, CartItem>(&format!(
      "INSERT INTO cart_items (id, cart_id, product_id, quantity) VALUES ($1, $2, $3, $4) \
       ON CONFLICT (cart_id, product_id) \
       DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity, updated_at = NOW() \
       RETURNING {CART_ITEM_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(cart_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_one(self.conn()?)
    .await?;
    Ok(item)
  }

  async fn set_cart_item_quantity(&mut self, cart_id: Uuid, item_id: Uuid, quantity: i32) -> AppResult<CartItem> {
    let item = sqlx::query_as::<_, CartItem>(&format!(
      "UPDATE cart_items SET quantity = $3, updated_at = NOW() WHERE id = $1 AND cart_id = $2 \
       RETURNING {CART_ITEM_COLUMNS}"
    ))
    .bind(item_id)
    .bind(cart_id)
    .bind(quantity)
    .fetch_optional(self.conn()?)
    .await?;
    item.ok_or_else(|| AppError::NotFound(format!("Cart item {} not found", item_id)))
  }

  async fn delete_cart_item(&mut self, cart_id: Uuid, item_id: Uuid) -> AppResult<bool> {
    let rows_affected = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND cart_id = $2")
      .bind(item_id)
      .bind(cart_id)
      .execute(self.conn()?)
      .await?
      .rows_affected();
    Ok(rows_affected == 1)
  }

  async fn clear_cart(&mut self, cart_id: Uuid) -> AppResult<u64> {
    let rows_affected = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
      .bind(cart_id)
      .execute(self.conn()?)
      .await?
      .rows_affected();
    Ok(rows_affected)
  }

  /// `created_at` is taken when the row is written, after the cart lock is held,
  /// so one user's placements list newest first in the order they took the lock.
  async fn insert_order(&mut self, order: NewOrder) -> AppResult<Order> {
    let conn = self.conn()?;
    let mut created = sqlx::query_as::<_, Order>(&format!(
      "INSERT INTO orders (id, user_id, status, total_amount, shipping_address_id, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, clock_timestamp(), clock_timestamp()) RETURNING {ORDER_COLUMNS}"
    ))
    .bind(order.id)
    .bind(order.user_id)
    .bind(OrderStatus::Pending)
    .bind(order.total_amount)
    .bind(order.shipping_address_id)
    .fetch_one(&mut *conn)
    .await?;

    for (position, item) in order.items.into_iter().enumerate() {
      let position = i32::try_from(position).map_err(|_| AppError::Internal("order has too many items".to_string()))?;
      let stored = sqlx::query_as::<_, OrderItem>(&format!(
        "INSERT INTO order_items (id, order_id, product_id, product_name, unit_price, quantity, position) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {ORDER_ITEM_COLUMNS}"
      ))
      .bind(Uuid::new_v4())
      .bind(created.id)
      .bind(item.product_id)
      .bind(&item.product_name)
      .bind(item.unit_price)
      .bind(item.quantity)
      .bind(position)
      .fetch_one(&mut *conn)
      .await?;
      created.items.push(stored);
    }
    Ok(created)
  }

  async fn commit(&mut self) -> AppResult<()> {
    let tx = self
      .tx
      .take()
      .ok_or_else(|| AppError::Internal("unit of work committed twice".to_string()))?;
    tx.commit().await?;
    Ok(())
  }
}
