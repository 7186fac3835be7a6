// storefront/src/services/mod.rs

//! Entry points for the core operations, plus the collaborators they use.
//!
//! Each operation takes the caller's identity as an explicit `UserId`, builds
//! the context for its pipeline and runs it through the registry.

pub mod cart_service;
pub mod inventory;
pub mod money;
pub mod order_service;
pub mod payment_mock;
pub mod payment_service;
pub mod payments;

pub use payment_mock::MockPaymentProvider;
pub use payments::{PaymentIntent, PaymentIntentRequest, PaymentProvider};
