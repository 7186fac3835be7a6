// storefront/src/services/cart_service.rs

//! Cart store operations.

use crate::errors::{AppError, Result as AppResult};
use crate::models::{CartItem, CartView, UserId};
use crate::pipelines::contexts::{
  AddToCartCtxData, ClearCartCtxData, RemoveCartItemCtxData, UpdateCartItemCtxData, ViewCartCtxData,
};
use crate::pipelines::run_to_completion;
use crate::state::AppState;
use crate::store::share;
use flowline::ContextData;
use tracing::instrument;
use uuid::Uuid;

/// Returns the caller's cart with live product data, creating it if needed.
#[instrument(name = "cart::get_or_create", skip(state), err)]
pub async fn get_or_create_cart(state: &AppState, user_id: UserId) -> AppResult<CartView> {
  let ctx_data = ContextData::new(ViewCartCtxData {
    tx: share(state.store.begin().await?),
    user_id,
    cart: None,
    view: None,
  });
  run_to_completion(&state.flows, ctx_data.clone()).await?;

  let view = ctx_data.write().view.take();
  view.ok_or_else(|| AppError::Internal("cart view pipeline completed without a view".to_string()))
}

/// Adds `quantity` of a product, merging into an existing line for it.
#[instrument(name = "cart::add_item", skip(state), err)]
pub async fn add_item(state: &AppState, user_id: UserId, product_id: Uuid, quantity: i32) -> AppResult<CartItem> {
  let ctx_data = ContextData::new(AddToCartCtxData {
    tx: share(state.store.begin().await?),
    user_id,
    product_id,
    quantity,
    cart: None,
    updated_cart_item: None,
  });
  run_to_completion(&state.flows, ctx_data.clone()).await?;

  let item = ctx_data.write().updated_cart_item.take();
  item.ok_or_else(|| AppError::Internal("Cart update completed, but item details are unavailable.".to_string()))
}

/// Replaces the quantity of one of the caller's cart lines.
#[instrument(name = "cart::update_item_quantity", skip(state), err)]
pub async fn update_item_quantity(
  state: &AppState,
  user_id: UserId,
  item_id: Uuid,
  quantity: i32,
) -> AppResult<CartItem> {
  let ctx_data = ContextData::new(UpdateCartItemCtxData {
    tx: share(state.store.begin().await?),
    user_id,
    item_id,
    quantity,
    cart: None,
    current_item: None,
    updated_cart_item: None,
  });
  run_to_completion(&state.flows, ctx_data.clone()).await?;

  let item = ctx_data.write().updated_cart_item.take();
  item.ok_or_else(|| AppError::Internal("Cart update completed, but item details are unavailable.".to_string()))
}

#[instrument(name = "cart::remove_item", skip(state), err)]
pub async fn remove_item(state: &AppState, user_id: UserId, item_id: Uuid) -> AppResult<()> {
  let ctx_data = ContextData::new(RemoveCartItemCtxData {
    tx: share(state.store.begin().await?),
    user_id,
    item_id,
    cart: None,
  });
  run_to_completion(&state.flows, ctx_data).await
}

/// Empties the caller's cart. The cart itself is kept.
#[instrument(name = "cart::clear", skip(state), err)]
pub async fn clear(state: &AppState, user_id: UserId) -> AppResult<u64> {
  let ctx_data = ContextData::new(ClearCartCtxData {
    tx: share(state.store.begin().await?),
    user_id,
    cart: None,
    removed_items: 0,
  });
  run_to_completion(&state.flows, ctx_data.clone()).await?;

  let removed = ctx_data.read().removed_items;
  Ok(removed)
}
