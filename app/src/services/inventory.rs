// storefront/src/services/inventory.rs

//! Inventory guard: the availability gate run when a cart line is added or
//! changed and again, authoritatively, when an order is placed. It only reads;
//! stock is never reserved or decremented here.

use crate::errors::{AppError, Result as AppResult};
use crate::models::Product;
use crate::store::StoreTx;
use tracing::{debug, warn};
use uuid::Uuid;

/// Outcome of checking one product against a requested quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
  Available,
  Inactive,
  InsufficientStock { available: i32 },
}

pub fn assess(product: &Product, requested_qty: i32) -> Availability {
  if !product.is_active {
    Availability::Inactive
  } else if product.stock < requested_qty {
    Availability::InsufficientStock {
      available: product.stock,
    }
  } else {
    Availability::Available
  }
}

/// Loads the product and fails with `NotFound`, `Unavailable` or
/// `InsufficientStock` (in that order of precedence). Returns the product as read.
pub async fn check_available(tx: &mut dyn StoreTx, product_id: Uuid, requested_qty: i32) -> AppResult<Product> {
  let product = tx
    .product(product_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product {} not found", product_id)))?;

  match assess(&product, requested_qty) {
    Availability::Available => {
      debug!(%product_id, requested_qty, stock = product.stock, "Inventory check passed.");
      Ok(product)
    }
    Availability::Inactive => {
      warn!(%product_id, "Inventory check failed: product is inactive.");
      Err(AppError::Unavailable { product_id })
    }
    Availability::InsufficientStock { available } => {
      warn!(%product_id, requested_qty, available, "Inventory check failed: insufficient stock.");
      Err(AppError::InsufficientStock {
        product_id,
        requested: requested_qty,
        available,
      })
    }
  }
}
