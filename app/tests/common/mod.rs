// storefront/tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::sync::Arc;
use storefront::config::AppConfig;
use storefront::models::{Address, Product, UserId};
use storefront::services::MockPaymentProvider;
use storefront::state::AppState;
use storefront::store::MemoryStore;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn money(value: &str) -> Decimal {
  value.parse().expect("valid decimal literal")
}

pub fn memory_config() -> AppConfig {
  AppConfig::from_lookup(|key| match key {
    "STORE_BACKEND" => Some("memory".to_string()),
    _ => None,
  })
  .expect("default memory config is valid")
}

/// Two shoppers, each with an address, and a small catalog:
/// A at 30.00 (stock 10), B at 40.00 (stock 5), an inactive product and a
/// product with a single unit left.
pub struct Fixture {
  pub state: AppState,
  pub store: MemoryStore,
  pub payments: Arc<MockPaymentProvider>,
  pub alice: UserId,
  pub bob: UserId,
  pub alice_address: Address,
  pub bob_address: Address,
  pub product_a: Product,
  pub product_b: Product,
  pub inactive_product: Product,
  pub last_unit_product: Product,
}

impl Fixture {
  pub async fn new() -> Self {
    Self::with_payments(Arc::new(MockPaymentProvider::new("mock_main_acct"))).await
  }

  pub async fn with_payments(payments: Arc<MockPaymentProvider>) -> Self {
    setup_tracing();
    let store = MemoryStore::new();

    let alice = UserId::new_random();
    let bob = UserId::new_random();
    let alice_address = Address::new(alice, "1 Market St", "Springfield", "12345", "US");
    let bob_address = Address::new(bob, "2 Harbour Rd", "Shelbyville", "54321", "US");
    store.put_address(alice_address.clone()).await;
    store.put_address(bob_address.clone()).await;

    let product_a = Product::new("Product A", money("30.00"), 10);
    let product_b = Product::new("Product B", money("40.00"), 5);
    let mut inactive_product = Product::new("Retired Gadget", money("15.00"), 50);
    inactive_product.is_active = false;
    let last_unit_product = Product::new("Last Unit", money("99.99"), 1);
    for product in [&product_a, &product_b, &inactive_product, &last_unit_product] {
      store.put_product(product.clone()).await;
    }

    let state = AppState::new(memory_config(), Arc::new(store.clone()), payments.clone());
    Self {
      state,
      store,
      payments,
      alice,
      bob,
      alice_address,
      bob_address,
      product_a,
      product_b,
      inactive_product,
      last_unit_product,
    }
  }

  /// Replaces a catalog entry's price, as catalog management would.
  pub async fn reprice(&self, product: &Product, unit_price: Decimal) {
    let mut updated = product.clone();
    updated.unit_price = unit_price;
    self.store.put_product(updated).await;
  }

  pub async fn restock(&self, product: &Product, stock: i32) {
    let mut updated = self.store.product(product.id).await.unwrap_or_else(|| product.clone());
    updated.stock = stock;
    self.store.put_product(updated).await;
  }
}
