// storefront/src/services/order_service.rs

//! Order assembler and order queries.

use crate::errors::{AppError, Result as AppResult};
use crate::models::{Order, UserId};
use crate::pipelines::contexts::PlaceOrderCtxData;
use crate::pipelines::run_to_completion;
use crate::state::AppState;
use crate::store::share;
use flowline::ContextData;
use rust_decimal::Decimal;
use tracing::instrument;
use uuid::Uuid;

/// Converts the caller's cart into an order shipped to `shipping_address_id`.
/// All writes commit together or not at all.
#[instrument(name = "orders::place", skip(state), err)]
pub async fn place_order(state: &AppState, user_id: UserId, shipping_address_id: Uuid) -> AppResult<Order> {
  let ctx_data = ContextData::new(PlaceOrderCtxData {
    tx: share(state.store.begin().await?),
    user_id,
    shipping_address_id,
    shipping_address: None,
    cart: None,
    cart_items: Vec::new(),
    priced_lines: Vec::new(),
    total_amount: Decimal::ZERO,
    order: None,
  });
  run_to_completion(&state.flows, ctx_data.clone()).await?;

  let order = ctx_data.write().order.take();
  order.ok_or_else(|| AppError::Internal("Checkout completed, but order details are unavailable.".to_string()))
}

/// The caller's orders, newest first.
#[instrument(name = "orders::list", skip(state), err)]
pub async fn list_orders(state: &AppState, user_id: UserId) -> AppResult<Vec<Order>> {
  state.store.list_orders(user_id).await
}

/// `NotFound` for unknown orders and for orders of other users alike.
#[instrument(name = "orders::get", skip(state), err)]
pub async fn get_order(state: &AppState, user_id: UserId, order_id: Uuid) -> AppResult<Order> {
  state
    .store
    .find_order(user_id, order_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))
}
