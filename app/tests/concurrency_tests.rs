// storefront/tests/concurrency_tests.rs
mod common;

use common::*;
use futures_util::future::join_all;
use std::collections::HashSet;
use storefront::errors::AppError;
use storefront::services::{cart_service, order_service};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_of_same_product_both_apply() {
  let fx = Fixture::new().await;

  let tasks = [2, 3].map(|quantity| {
    let state = fx.state.clone();
    let (user, product_id) = (fx.alice, fx.product_a.id);
    tokio::spawn(async move { cart_service::add_item(&state, user, product_id, quantity).await })
  });
  for result in join_all(tasks).await {
    result.expect("task panicked").expect("add_item failed");
  }

  let cart = cart_service::get_or_create_cart(&fx.state, fx.alice).await.unwrap();
  assert_eq!(cart.items.len(), 1);
  assert_eq!(cart.items[0].quantity, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_access_creates_one_cart() {
  let fx = Fixture::new().await;

  let tasks: Vec<_> = (0..8)
    .map(|_| {
      let state = fx.state.clone();
      let user = fx.alice;
      tokio::spawn(async move { cart_service::get_or_create_cart(&state, user).await })
    })
    .collect();

  let cart_ids: HashSet<_> = join_all(tasks)
    .await
    .into_iter()
    .map(|r| r.expect("task panicked").expect("get_or_create_cart failed").cart_id)
    .collect();
  assert_eq!(cart_ids.len(), 1);
  assert_eq!(fx.store.cart_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_never_exceed_stock() {
  let fx = Fixture::new().await;

  let tasks: Vec<_> = (0..4)
    .map(|_| {
      let state = fx.state.clone();
      let (user, product_id) = (fx.alice, fx.product_b.id);
      tokio::spawn(async move { cart_service::add_item(&state, user, product_id, 2).await })
    })
    .collect();

  let mut rejected = 0;
  for result in join_all(tasks).await {
    match result.expect("task panicked") {
      Ok(_) => {}
      Err(AppError::InsufficientStock { .. }) => rejected += 1,
      Err(other) => panic!("unexpected error: {:?}", other),
    }
  }

  // Stock is 5: two adds of 2 fit, the other two are rejected.
  assert_eq!(rejected, 2);
  let cart = cart_service::get_or_create_cart(&fx.state, fx.alice).await.unwrap();
  assert_eq!(cart.items[0].quantity, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_placements_produce_a_single_order() {
  let fx = Fixture::new().await;
  cart_service::add_item(&fx.state, fx.alice, fx.product_a.id, 1).await.unwrap();

  let tasks: Vec<_> = (0..2)
    .map(|_| {
      let state = fx.state.clone();
      let (user, address_id) = (fx.alice, fx.alice_address.id);
      tokio::spawn(async move { order_service::place_order(&state, user, address_id).await })
    })
    .collect();

  let mut placed = 0;
  for result in join_all(tasks).await {
    match result.expect("task panicked") {
      Ok(_) => placed += 1,
      Err(AppError::EmptyCart) => {}
      Err(other) => panic!("unexpected error: {:?}", other),
    }
  }

  assert_eq!(placed, 1);
  assert_eq!(fx.store.order_count().await, 1);
}
