// storefront/tests/cart_tests.rs
mod common;

use common::*;
use storefront::errors::AppError;
use storefront::services::cart_service;
use uuid::Uuid;

#[tokio::test]
async fn test_get_or_create_cart_is_idempotent() {
  let fx = Fixture::new().await;

  let first = cart_service::get_or_create_cart(&fx.state, fx.alice).await.unwrap();
  let second = cart_service::get_or_create_cart(&fx.state, fx.alice).await.unwrap();

  assert_eq!(first.cart_id, second.cart_id);
  assert!(first.is_empty());
  assert_eq!(first.total_cost, money("0"));
  assert_eq!(fx.store.cart_count().await, 1);
}

#[tokio::test]
async fn test_add_item_then_view_shows_single_line() {
  let fx = Fixture::new().await;

  let item = cart_service::add_item(&fx.state, fx.alice, fx.product_a.id, 3).await.unwrap();
  assert_eq!(item.quantity, 3);

  let cart = cart_service::get_or_create_cart(&fx.state, fx.alice).await.unwrap();
  assert_eq!(cart.items.len(), 1);
  let line = &cart.items[0];
  assert_eq!(line.item_id, item.id);
  assert_eq!(line.product_id, fx.product_a.id);
  assert_eq!(line.product_name, "Product A");
  assert_eq!(line.quantity, 3);
  assert_eq!(line.item_total, money("90.00"));
  assert!(line.available);
  assert_eq!(cart.total_cost, money("90.00"));
}

#[tokio::test]
async fn test_adding_same_product_twice_merges_lines() {
  let fx = Fixture::new().await;

  let first = cart_service::add_item(&fx.state, fx.alice, fx.product_a.id, 2).await.unwrap();
  let second = cart_service::add_item(&fx.state, fx.alice, fx.product_a.id, 3).await.unwrap();

  assert_eq!(first.id, second.id);
  assert_eq!(second.quantity, 5);
  let cart = cart_service::get_or_create_cart(&fx.state, fx.alice).await.unwrap();
  assert_eq!(cart.items.len(), 1);
  assert_eq!(cart.items[0].quantity, 5);
}

#[tokio::test]
async fn test_add_item_exceeding_stock_leaves_cart_unchanged() {
  let fx = Fixture::new().await;
  cart_service::add_item(&fx.state, fx.alice, fx.product_b.id, 1).await.unwrap();

  let err = cart_service::add_item(&fx.state, fx.alice, fx.product_a.id, 11).await.unwrap_err();
  assert!(
    matches!(err, AppError::InsufficientStock { product_id, requested: 11, available: 10 } if product_id == fx.product_a.id),
    "got {:?}",
    err
  );

  let cart = cart_service::get_or_create_cart(&fx.state, fx.alice).await.unwrap();
  assert_eq!(cart.items.len(), 1);
  assert!(cart.line_for_product(fx.product_a.id).is_none());
}

#[tokio::test]
async fn test_add_item_checks_cumulative_quantity() {
  let fx = Fixture::new().await;
  cart_service::add_item(&fx.state, fx.alice, fx.product_b.id, 4).await.unwrap();

  let err = cart_service::add_item(&fx.state, fx.alice, fx.product_b.id, 2).await.unwrap_err();
  assert!(matches!(err, AppError::InsufficientStock { requested: 6, available: 5, .. }), "got {:?}", err);

  let cart = cart_service::get_or_create_cart(&fx.state, fx.alice).await.unwrap();
  assert_eq!(cart.line_for_product(fx.product_b.id).map(|l| l.quantity), Some(4));
}

#[tokio::test]
async fn test_add_item_rejects_bad_input_and_unknown_or_inactive_products() {
  let fx = Fixture::new().await;

  for quantity in [0, -3] {
    let err = cart_service::add_item(&fx.state, fx.alice, fx.product_a.id, quantity).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "quantity {} gave {:?}", quantity, err);
  }

  let err = cart_service::add_item(&fx.state, fx.alice, Uuid::new_v4(), 1).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)), "got {:?}", err);

  let err = cart_service::add_item(&fx.state, fx.alice, fx.inactive_product.id, 1).await.unwrap_err();
  assert!(
    matches!(err, AppError::Unavailable { product_id } if product_id == fx.inactive_product.id),
    "got {:?}",
    err
  );

  let cart = cart_service::get_or_create_cart(&fx.state, fx.alice).await.unwrap();
  assert!(cart.is_empty());
}

#[tokio::test]
async fn test_update_item_quantity_replaces_and_revalidates() {
  let fx = Fixture::new().await;
  let item = cart_service::add_item(&fx.state, fx.alice, fx.product_a.id, 2).await.unwrap();

  let updated = cart_service::update_item_quantity(&fx.state, fx.alice, item.id, 7).await.unwrap();
  assert_eq!(updated.id, item.id);
  assert_eq!(updated.quantity, 7);

  // Checked as the new absolute quantity, not as 7 + 10.
  let updated = cart_service::update_item_quantity(&fx.state, fx.alice, item.id, 10).await.unwrap();
  assert_eq!(updated.quantity, 10);

  let err = cart_service::update_item_quantity(&fx.state, fx.alice, item.id, 11).await.unwrap_err();
  assert!(matches!(err, AppError::InsufficientStock { .. }), "got {:?}", err);

  let err = cart_service::update_item_quantity(&fx.state, fx.alice, item.id, 0).await.unwrap_err();
  assert!(matches!(err, AppError::Validation(_)), "got {:?}", err);

  let cart = cart_service::get_or_create_cart(&fx.state, fx.alice).await.unwrap();
  assert_eq!(cart.items[0].quantity, 10);
}

#[tokio::test]
async fn test_other_users_cart_items_are_not_found() {
  let fx = Fixture::new().await;
  let alice_item = cart_service::add_item(&fx.state, fx.alice, fx.product_a.id, 1).await.unwrap();

  let err = cart_service::update_item_quantity(&fx.state, fx.bob, alice_item.id, 2).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)), "got {:?}", err);

  let err = cart_service::remove_item(&fx.state, fx.bob, alice_item.id).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)), "got {:?}", err);

  let cart = cart_service::get_or_create_cart(&fx.state, fx.alice).await.unwrap();
  assert_eq!(cart.items[0].quantity, 1);
}

#[tokio::test]
async fn test_remove_item_deletes_only_that_line() {
  let fx = Fixture::new().await;
  let a = cart_service::add_item(&fx.state, fx.alice, fx.product_a.id, 1).await.unwrap();
  cart_service::add_item(&fx.state, fx.alice, fx.product_b.id, 1).await.unwrap();

  cart_service::remove_item(&fx.state, fx.alice, a.id).await.unwrap();

  let cart = cart_service::get_or_create_cart(&fx.state, fx.alice).await.unwrap();
  assert_eq!(cart.items.len(), 1);
  assert_eq!(cart.items[0].product_id, fx.product_b.id);

  let err = cart_service::remove_item(&fx.state, fx.alice, a.id).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_clear_empties_cart_and_keeps_it() {
  let fx = Fixture::new().await;
  let before = cart_service::get_or_create_cart(&fx.state, fx.alice).await.unwrap();
  cart_service::add_item(&fx.state, fx.alice, fx.product_a.id, 1).await.unwrap();
  cart_service::add_item(&fx.state, fx.alice, fx.product_b.id, 2).await.unwrap();

  assert_eq!(cart_service::clear(&fx.state, fx.alice).await.unwrap(), 2);
  assert_eq!(cart_service::clear(&fx.state, fx.alice).await.unwrap(), 0);

  let after = cart_service::get_or_create_cart(&fx.state, fx.alice).await.unwrap();
  assert_eq!(after.cart_id, before.cart_id);
  assert!(after.is_empty());
}

#[tokio::test]
async fn test_view_flags_lines_that_no_longer_pass_inventory() {
  let fx = Fixture::new().await;
  cart_service::add_item(&fx.state, fx.alice, fx.product_a.id, 4).await.unwrap();
  fx.restock(&fx.product_a, 2).await;
  fx.reprice(&fx.product_b, money("45.00")).await;
  cart_service::add_item(&fx.state, fx.alice, fx.product_b.id, 1).await.unwrap();

  let cart = cart_service::get_or_create_cart(&fx.state, fx.alice).await.unwrap();
  let line_a = cart.line_for_product(fx.product_a.id).unwrap();
  let line_b = cart.line_for_product(fx.product_b.id).unwrap();
  assert!(!line_a.available);
  assert!(line_b.available);
  assert_eq!(line_b.unit_price, money("45.00"));
  assert_eq!(cart.total_cost, money("165.00"));
}
