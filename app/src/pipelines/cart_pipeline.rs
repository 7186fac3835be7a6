// storefront/src/pipelines/cart_pipeline.rs

use crate::errors::AppError;
use crate::models::{CartLine, CartView};
use crate::pipelines::common_steps::{self, locked_cart, validate_positive_quantity};
use crate::pipelines::contexts::{
  AddToCartCtxData, ClearCartCtxData, RemoveCartItemCtxData, UpdateCartItemCtxData, ViewCartCtxData,
};
use crate::services::{inventory, money};
use flowline::{ContextData, Flowline, Pipeline, PipelineControl};
use rust_decimal::Decimal;
use tracing::{info, warn};

pub fn register_cart_pipelines(registry: &Flowline<AppError>) {
  registry.register_pipeline(build_view_cart_pipeline());
  registry.register_pipeline(build_add_to_cart_pipeline());
  registry.register_pipeline(build_update_cart_item_pipeline());
  registry.register_pipeline(build_remove_cart_item_pipeline());
  registry.register_pipeline(build_clear_cart_pipeline());
  info!("Cart pipelines registered.");
}

pub fn build_view_cart_pipeline() -> Pipeline<ViewCartCtxData, AppError> {
  let mut p = Pipeline::<ViewCartCtxData, AppError>::new(&[
    ("lock_cart", false, None),
    ("load_cart_view", false, None),
    ("commit", false, None),
  ]);

  p.on("lock_cart", common_steps::lock_cart_step::<ViewCartCtxData>);

  p.on("load_cart_view", |ctx_data: ContextData<ViewCartCtxData>| {
    Box::pin(async move {
      let cart = locked_cart(&ctx_data)?;
      let uow = { ctx_data.read().tx.clone() };

      let mut lines = Vec::new();
      {
        let mut tx = uow.lock().await;
        for item in tx.cart_items(cart.id).await? {
          // Lines follow the live product; a product removed from the catalog
          // after it was added simply drops out of the view.
          let Some(product) = tx.product(item.product_id).await? else {
            warn!("View Cart Pipeline: Product {} of cart item {} no longer exists.", item.product_id, item.id);
            continue;
          };
          let available = inventory::assess(&product, item.quantity) == inventory::Availability::Available;
          lines.push(CartLine {
            item_id: item.id,
            product_id: product.id,
            item_total: money::line_total(product.unit_price, item.quantity),
            product_name: product.name,
            unit_price: product.unit_price,
            quantity: item.quantity,
            available,
          });
        }
      }

      let total_cost: Decimal = lines.iter().map(|l| l.item_total).sum();
      info!(
        "View Cart Pipeline: Cart {} has {} line(s), total {}.",
        cart.id,
        lines.len(),
        total_cost
      );
      ctx_data.write().view = Some(CartView {
        cart_id: cart.id,
        user_id: cart.user_id,
        items: lines,
        total_cost,
      });
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on("commit", common_steps::commit_step::<ViewCartCtxData>);
  p
}

pub fn build_add_to_cart_pipeline() -> Pipeline<AddToCartCtxData, AppError> {
  let mut p = Pipeline::<AddToCartCtxData, AppError>::new(&[
    ("validate_cart_input", false, None),
    ("lock_cart", false, None),
    ("check_product_availability", false, None),
    ("add_or_update_cart_item", false, None),
    ("commit", false, None),
  ]);

  // Step 1: Validate input
  p.on("validate_cart_input", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let quantity = { ctx_data.read().quantity };
      if let Err(e) = validate_positive_quantity(quantity) {
        warn!("Add to Cart Pipeline: Invalid quantity ({}) provided.", quantity);
        return Err(e);
      }
      info!("Add to Cart Pipeline: Input quantity ({}) validated.", quantity);
      Ok(PipelineControl::Continue)
    })
  });

  // Step 2: Get-or-create and lock the cart
  p.on("lock_cart", common_steps::lock_cart_step::<AddToCartCtxData>);

  // Step 3: Check the cumulative quantity against the inventory guard
  p.on("check_product_availability", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let cart = locked_cart(&ctx_data)?;
      let (uow, product_id, requested) = {
        let guard = ctx_data.read();
        (guard.tx.clone(), guard.product_id, guard.quantity)
      };

      let mut tx = uow.lock().await;
      let already_in_cart = tx
        .cart_item_for_product(cart.id, product_id)
        .await?
        .map_or(0, |item| item.quantity);
      let cumulative = already_in_cart
        .checked_add(requested)
        .ok_or_else(|| AppError::Validation("Quantity is too large.".to_string()))?;

      info!(
        "Add to Cart Pipeline: Checking stock for product {}: {} in cart + {} requested.",
        product_id, already_in_cart, requested
      );
      inventory::check_available(&mut **tx, product_id, cumulative).await?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 4: Insert the line or increment the existing one
  p.on("add_or_update_cart_item", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let cart = locked_cart(&ctx_data)?;
      let (uow, product_id, quantity) = {
        let guard = ctx_data.read();
        (guard.tx.clone(), guard.product_id, guard.quantity)
      };

      let item = { uow.lock().await.add_cart_quantity(cart.id, product_id, quantity).await? };
      info!(
        "Add to Cart Pipeline: Cart item {} (product {}) now has quantity {}.",
        item.id, product_id, item.quantity
      );
      ctx_data.write().updated_cart_item = Some(item);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 5: Commit
  p.on("commit", common_steps::commit_step::<AddToCartCtxData>);
  p
}

pub fn build_update_cart_item_pipeline() -> Pipeline<UpdateCartItemCtxData, AppError> {
  let mut p = Pipeline::<UpdateCartItemCtxData, AppError>::new(&[
    ("validate_quantity", false, None),
    ("lock_cart", false, None),
    ("resolve_cart_item", false, None),
    ("check_product_availability", false, None),
    ("set_cart_item_quantity", false, None),
    ("commit", false, None),
  ]);

  p.on("validate_quantity", |ctx_data: ContextData<UpdateCartItemCtxData>| {
    Box::pin(async move {
      let quantity = { ctx_data.read().quantity };
      validate_positive_quantity(quantity)?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on("lock_cart", common_steps::lock_cart_step::<UpdateCartItemCtxData>);

  // Items of other users' carts are indistinguishable from missing ones.
  p.on("resolve_cart_item", |ctx_data: ContextData<UpdateCartItemCtxData>| {
    Box::pin(async move {
      let cart = locked_cart(&ctx_data)?;
      let (uow, item_id) = {
        let guard = ctx_data.read();
        (guard.tx.clone(), guard.item_id)
      };

      let item = { uow.lock().await.cart_item(cart.id, item_id).await? };
      let Some(item) = item else {
        warn!("Update Cart Pipeline: Cart item {} not found in cart {}.", item_id, cart.id);
        return Err(AppError::NotFound(format!("Cart item {} not found", item_id)));
      };
      ctx_data.write().current_item = Some(item);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // The new quantity replaces the old one, so it is checked as is.
  p.on("check_product_availability", |ctx_data: ContextData<UpdateCartItemCtxData>| {
    Box::pin(async move {
      let (uow, product_id, quantity) = {
        let guard = ctx_data.read();
        let product_id = guard.current_item.as_ref().map(|item| item.product_id);
        (guard.tx.clone(), product_id, guard.quantity)
      };
      let product_id =
        product_id.ok_or_else(|| AppError::Internal("availability checked before resolve_cart_item".to_string()))?;

      let mut tx = uow.lock().await;
      inventory::check_available(&mut **tx, product_id, quantity).await?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on("set_cart_item_quantity", |ctx_data: ContextData<UpdateCartItemCtxData>| {
    Box::pin(async move {
      let cart = locked_cart(&ctx_data)?;
      let (uow, item_id, quantity) = {
        let guard = ctx_data.read();
        (guard.tx.clone(), guard.item_id, guard.quantity)
      };

      let item = { uow.lock().await.set_cart_item_quantity(cart.id, item_id, quantity).await? };
      info!("Update Cart Pipeline: Cart item {} set to quantity {}.", item.id, item.quantity);
      ctx_data.write().updated_cart_item = Some(item);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on("commit", common_steps::commit_step::<UpdateCartItemCtxData>);
  p
}

pub fn build_remove_cart_item_pipeline() -> Pipeline<RemoveCartItemCtxData, AppError> {
  let mut p = Pipeline::<RemoveCartItemCtxData, AppError>::new(&[
    ("lock_cart", false, None),
    ("delete_cart_item", false, None),
    ("commit", false, None),
  ]);

  p.on("lock_cart", common_steps::lock_cart_step::<RemoveCartItemCtxData>);

  p.on("delete_cart_item", |ctx_data: ContextData<RemoveCartItemCtxData>| {
    Box::pin(async move {
      let cart = locked_cart(&ctx_data)?;
      let (uow, item_id) = {
        let guard = ctx_data.read();
        (guard.tx.clone(), guard.item_id)
      };

      let deleted = { uow.lock().await.delete_cart_item(cart.id, item_id).await? };
      if !deleted {
        warn!("Remove Cart Item Pipeline: Cart item {} not found in cart {}.", item_id, cart.id);
        return Err(AppError::NotFound(format!("Cart item {} not found", item_id)));
      }
      info!("Remove Cart Item Pipeline: Cart item {} removed.", item_id);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on("commit", common_steps::commit_step::<RemoveCartItemCtxData>);
  p
}

pub fn build_clear_cart_pipeline() -> Pipeline<ClearCartCtxData, AppError> {
  let mut p = Pipeline::<ClearCartCtxData, AppError>::new(&[
    ("lock_cart", false, None),
    ("clear_cart_items", false, None),
    ("commit", false, None),
  ]);

  p.on("lock_cart", common_steps::lock_cart_step::<ClearCartCtxData>);

  p.on("clear_cart_items", |ctx_data: ContextData<ClearCartCtxData>| {
    Box::pin(async move {
      let cart = locked_cart(&ctx_data)?;
      let uow = { ctx_data.read().tx.clone() };

      let removed = { uow.lock().await.clear_cart(cart.id).await? };
      info!("Clear Cart Pipeline: Removed {} item(s) from cart {}.", removed, cart.id);
      ctx_data.write().removed_items = removed;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on("commit", common_steps::commit_step::<ClearCartCtxData>);
  p
}
