// storefront/src/pipelines/common_steps.rs

//! Steps shared by every pipeline that works on the caller's cart.

use crate::errors::{AppError, Result as AppResult};
use crate::models::Cart;
use crate::pipelines::contexts::CartScoped;
use flowline::{ContextData, PipelineControl};
use tracing::{debug, info, instrument};

/// Rejects a quantity that is not a positive integer.
pub fn validate_positive_quantity(quantity: i32) -> AppResult<()> {
  if quantity <= 0 {
    return Err(AppError::Validation("Quantity must be a positive number.".to_string()));
  }
  Ok(())
}

/// The cart locked by an earlier `lock_cart` step.
pub fn locked_cart<C: CartScoped>(ctx_data: &ContextData<C>) -> AppResult<Cart> {
  ctx_data
    .read()
    .cart()
    .cloned()
    .ok_or_else(|| AppError::Internal("cart step ran before lock_cart".to_string()))
}

/// Gets or creates the caller's cart and holds its lock for the rest of the run.
#[instrument(name = "common_step::lock_cart", skip(ctx_data), err)]
pub async fn lock_cart_step<C: CartScoped>(ctx_data: ContextData<C>) -> AppResult<PipelineControl> {
  let (uow, user_id) = {
    let guard = ctx_data.read();
    (guard.unit_of_work(), guard.user_id())
  };

  let cart = {
    let mut tx = uow.lock().await;
    tx.lock_cart(user_id).await?
  };
  debug!(%user_id, cart_id = %cart.id, "Cart locked.");

  ctx_data.write().set_cart(cart);
  Ok(PipelineControl::Continue)
}

/// Commits the unit of work. Always the last step of a mutating pipeline.
#[instrument(name = "common_step::commit", skip(ctx_data), err)]
pub async fn commit_step<C: CartScoped>(ctx_data: ContextData<C>) -> AppResult<PipelineControl> {
  let (uow, user_id) = {
    let guard = ctx_data.read();
    (guard.unit_of_work(), guard.user_id())
  };

  uow.lock().await.commit().await?;
  info!(%user_id, "Unit of work committed.");
  Ok(PipelineControl::Continue)
}
