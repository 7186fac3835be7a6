// storefront/src/pipelines/checkout_pipeline.rs

//! Order placement: turns the caller's cart into an immutable order inside a
//! single unit of work. Any failing step leaves the unit of work uncommitted,
//! so nothing of a failed placement becomes visible.

use crate::errors::AppError;
use crate::models::{NewOrder, NewOrderItem};
use crate::pipelines::common_steps::{self, locked_cart};
use crate::pipelines::contexts::{PlaceOrderCtxData, PricedLine};
use crate::services::{inventory, money};
use flowline::{ContextData, Flowline, Pipeline, PipelineControl};
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use uuid::Uuid;

pub fn register_checkout_pipeline(registry: &Flowline<AppError>) {
  registry.register_pipeline(build_place_order_pipeline());
  info!("Checkout pipeline registered.");
}

pub fn build_place_order_pipeline() -> Pipeline<PlaceOrderCtxData, AppError> {
  let mut p = Pipeline::<PlaceOrderCtxData, AppError>::new(&[
    ("resolve_shipping_address", false, None),
    ("lock_cart", false, None),
    ("load_cart_items", false, None),
    ("revalidate_inventory", false, None),
    ("compute_order_total", false, None),
    ("create_order_with_snapshots", false, None),
    ("clear_cart", false, None),
    ("commit_order", false, None),
  ]);

  // Step 1: The address must exist and belong to the caller. Both failures
  // look the same to the caller.
  p.on("resolve_shipping_address", |ctx_data: ContextData<PlaceOrderCtxData>| {
    Box::pin(async move {
      let (uow, user_id, address_id) = {
        let guard = ctx_data.read();
        (guard.tx.clone(), guard.user_id, guard.shipping_address_id)
      };

      let address = { uow.lock().await.address(address_id).await? };
      match address {
        Some(address) if address.user_id == user_id => {
          info!("Checkout Pipeline: Shipping address {} resolved for user {}.", address_id, user_id);
          ctx_data.write().shipping_address = Some(address);
          Ok::<_, AppError>(PipelineControl::Continue)
        }
        _ => {
          warn!("Checkout Pipeline: Address {} is not owned by user {}.", address_id, user_id);
          Err(AppError::AddressNotOwned)
        }
      }
    })
  });

  // Step 2: Lock the cart so concurrent cart mutations wait for this order.
  p.on("lock_cart", common_steps::lock_cart_step::<PlaceOrderCtxData>);

  // Step 3: A missing cart was created empty by lock_cart, so both cases end here.
  p.on("load_cart_items", |ctx_data: ContextData<PlaceOrderCtxData>| {
    Box::pin(async move {
      let cart = locked_cart(&ctx_data)?;
      let uow = { ctx_data.read().tx.clone() };

      let items = { uow.lock().await.cart_items(cart.id).await? };
      if items.is_empty() {
        warn!("Checkout Pipeline: Cart {} is empty.", cart.id);
        return Err(AppError::EmptyCart);
      }
      info!("Checkout Pipeline: Cart {} has {} line(s).", cart.id, items.len());
      ctx_data.write().cart_items = items;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 4: The authoritative inventory check. The product rows read here are
  // the ones priced and snapshotted below.
  p.on("revalidate_inventory", |ctx_data: ContextData<PlaceOrderCtxData>| {
    Box::pin(async move {
      let (uow, items) = {
        let guard = ctx_data.read();
        (guard.tx.clone(), guard.cart_items.clone())
      };

      let mut priced_lines = Vec::with_capacity(items.len());
      {
        let mut tx = uow.lock().await;
        for item in items {
          let product = inventory::check_available(&mut **tx, item.product_id, item.quantity).await?;
          priced_lines.push(PricedLine { item, product });
        }
      }
      info!("Checkout Pipeline: {} line(s) passed the inventory check.", priced_lines.len());
      ctx_data.write().priced_lines = priced_lines;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 5: Exact decimal total over the validated lines.
  p.on("compute_order_total", |ctx_data: ContextData<PlaceOrderCtxData>| {
    Box::pin(async move {
      let total = {
        let mut guard = ctx_data.write();
        let total: Decimal = guard
          .priced_lines
          .iter()
          .map(|line| money::line_total(line.product.unit_price, line.item.quantity))
          .sum();
        guard.total_amount = total;
        total
      };
      info!("Checkout Pipeline: Order total computed: {}.", total);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 6: Order row plus one snapshot item per line.
  p.on("create_order_with_snapshots", |ctx_data: ContextData<PlaceOrderCtxData>| {
    Box::pin(async move {
      let (uow, new_order) = {
        let guard = ctx_data.read();
        let new_order = NewOrder {
          id: Uuid::new_v4(),
          user_id: guard.user_id,
          shipping_address_id: guard.shipping_address_id,
          total_amount: guard.total_amount,
          items: guard
            .priced_lines
            .iter()
            .map(|line| NewOrderItem {
              product_id: line.product.id,
              product_name: line.product.name.clone(),
              unit_price: line.product.unit_price,
              quantity: line.item.quantity,
            })
            .collect(),
        };
        (guard.tx.clone(), new_order)
      };

      let order = { uow.lock().await.insert_order(new_order).await? };
      if order.items_total() != order.total_amount {
        error!(
          "Checkout Pipeline: Order {} items sum to {} but total is {}.",
          order.id,
          order.items_total(),
          order.total_amount
        );
        return Err(AppError::Internal("order items do not add up to the order total".to_string()));
      }
      info!(
        "Checkout Pipeline: Order {} created with {} item(s), total {}.",
        order.id,
        order.items.len(),
        order.total_amount
      );
      ctx_data.write().order = Some(order);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 7: Empty the cart; the cart row itself stays.
  p.on("clear_cart", |ctx_data: ContextData<PlaceOrderCtxData>| {
    Box::pin(async move {
      let cart = locked_cart(&ctx_data)?;
      let uow = { ctx_data.read().tx.clone() };

      let removed = { uow.lock().await.clear_cart(cart.id).await? };
      info!("Checkout Pipeline: Cleared {} item(s) from cart {}.", removed, cart.id);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 8: Publish everything at once.
  p.on("commit_order", common_steps::commit_step::<PlaceOrderCtxData>);
  p
}
