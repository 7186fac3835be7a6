// storefront/src/services/payment_mock.rs
use super::payments::{PaymentIntent, PaymentIntentRequest, PaymentProvider};
use crate::errors::{AppError, Result as AppResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{info, instrument};
use uuid::Uuid;

/// In-process payment provider. Records every request it receives.
#[derive(Debug, Default)]
pub struct MockPaymentProvider {
  account_id: String,
  fail_with: Option<String>,
  requests: Mutex<Vec<PaymentIntentRequest>>,
}

impl MockPaymentProvider {
  pub fn new(account_id: impl Into<String>) -> Self {
    Self {
      account_id: account_id.into(),
      ..Default::default()
    }
  }

  /// A provider that rejects every request with `reason`.
  pub fn failing(account_id: impl Into<String>, reason: impl Into<String>) -> Self {
    Self {
      account_id: account_id.into(),
      fail_with: Some(reason.into()),
      ..Default::default()
    }
  }

  pub fn requests(&self) -> Vec<PaymentIntentRequest> {
    self.requests.lock().clone()
  }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
  #[instrument(
    name = "MockPaymentProvider::create_intent",
    skip(self, request),
    fields(amount = request.amount_minor, currency = %request.currency, payment_account_id = %self.account_id)
  )]
  async fn create_intent(&self, request: PaymentIntentRequest) -> AppResult<PaymentIntent> {
    info!("Simulating creation of payment intent for account '{}'", self.account_id);
    self.requests.lock().push(request.clone());

    if let Some(reason) = &self.fail_with {
      return Err(AppError::Payment(reason.clone()));
    }
    if request.amount_minor <= 0 {
      return Err(AppError::Payment("Amount must be greater than zero".to_string()));
    }

    let intent_id = format!("mock_pi_{}", Uuid::new_v4().simple());
    Ok(PaymentIntent {
      client_secret: format!("{}_secret_{}", intent_id, Uuid::new_v4().simple()),
      id: intent_id,
      amount_minor: request.amount_minor,
      currency: request.currency,
      status: "requires_payment_method".to_string(),
    })
  }
}
