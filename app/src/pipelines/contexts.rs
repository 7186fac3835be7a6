// storefront/src/pipelines/contexts.rs

//! Run state of each pipeline. Handlers receive these wrapped in
//! `flowline::ContextData`.

use crate::models::{Address, Cart, CartItem, CartView, Order, Product, UserId};
use crate::services::payments::PaymentIntent;
use crate::state::AppState;
use crate::store::SharedTx;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Implemented by every context whose pipeline works on the caller's cart
/// inside one unit of work.
pub trait CartScoped: Send + Sync + 'static {
  fn unit_of_work(&self) -> SharedTx;
  fn user_id(&self) -> UserId;
  fn cart(&self) -> Option<&Cart>;
  fn set_cart(&mut self, cart: Cart);
}

macro_rules! impl_cart_scoped {
  ($($ctx:ty),+ $(,)?) => {
    $(
      impl CartScoped for $ctx {
        fn unit_of_work(&self) -> SharedTx {
          self.tx.clone()
        }
        fn user_id(&self) -> UserId {
          self.user_id
        }
        fn cart(&self) -> Option<&Cart> {
          self.cart.as_ref()
        }
        fn set_cart(&mut self, cart: Cart) {
          self.cart = Some(cart);
        }
      }
    )+
  };
}

pub struct ViewCartCtxData {
  pub tx: SharedTx,
  pub user_id: UserId,
  pub cart: Option<Cart>,
  pub view: Option<CartView>,
}

pub struct AddToCartCtxData {
  pub tx: SharedTx,
  pub user_id: UserId,
  pub product_id: Uuid,
  pub quantity: i32,
  pub cart: Option<Cart>,
  pub updated_cart_item: Option<CartItem>,
}

pub struct UpdateCartItemCtxData {
  pub tx: SharedTx,
  pub user_id: UserId,
  pub item_id: Uuid,
  pub quantity: i32,
  pub cart: Option<Cart>,
  pub current_item: Option<CartItem>,
  pub updated_cart_item: Option<CartItem>,
}

pub struct RemoveCartItemCtxData {
  pub tx: SharedTx,
  pub user_id: UserId,
  pub item_id: Uuid,
  pub cart: Option<Cart>,
}

pub struct ClearCartCtxData {
  pub tx: SharedTx,
  pub user_id: UserId,
  pub cart: Option<Cart>,
  pub removed_items: u64,
}

/// A cart line together with the product row it was validated against.
#[derive(Debug, Clone)]
pub struct PricedLine {
  pub item: CartItem,
  pub product: Product,
}

pub struct PlaceOrderCtxData {
  pub tx: SharedTx,
  pub user_id: UserId,
  pub shipping_address_id: Uuid,
  pub shipping_address: Option<Address>,
  pub cart: Option<Cart>,
  pub cart_items: Vec<CartItem>,
  pub priced_lines: Vec<PricedLine>,
  pub total_amount: Decimal,
  pub order: Option<Order>,
}

impl_cart_scoped!(
  ViewCartCtxData,
  AddToCartCtxData,
  UpdateCartItemCtxData,
  RemoveCartItemCtxData,
  ClearCartCtxData,
  PlaceOrderCtxData,
);

pub struct PaymentIntentCtxData {
  pub app_state: AppState,
  pub user_id: UserId,
  pub order_id: Uuid,
  pub order: Option<Order>,
  pub amount_minor: Option<i64>,
  pub intent: Option<PaymentIntent>,
}
