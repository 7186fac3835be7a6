// storefront/src/services/payments.rs

//! The external payment-provider collaborator.

use crate::errors::Result as AppResult;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentRequest {
  /// Integer amount in the currency's minor unit.
  pub amount_minor: i64,
  pub currency: String,
  pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentIntent {
  pub id: String,
  /// Opaque token the client hands to the provider to complete payment.
  pub client_secret: String,
  pub amount_minor: i64,
  pub currency: String,
  pub status: String,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
  /// Fails with `AppError::Payment` when the provider rejects the request.
  async fn create_intent(&self, request: PaymentIntentRequest) -> AppResult<PaymentIntent>;
}
