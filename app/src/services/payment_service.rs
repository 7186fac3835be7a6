// storefront/src/services/payment_service.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::UserId;
use crate::pipelines::contexts::PaymentIntentCtxData;
use crate::pipelines::run_to_completion;
use crate::services::payments::PaymentIntent;
use crate::state::AppState;
use flowline::ContextData;
use tracing::instrument;
use uuid::Uuid;

/// Starts a payment for one of the caller's pending orders.
#[instrument(name = "payments::create_intent", skip(state), err)]
pub async fn create_payment_intent(state: &AppState, user_id: UserId, order_id: Uuid) -> AppResult<PaymentIntent> {
  let ctx_data = ContextData::new(PaymentIntentCtxData {
    app_state: state.clone(),
    user_id,
    order_id,
    order: None,
    amount_minor: None,
    intent: None,
  });
  run_to_completion(&state.flows, ctx_data.clone()).await?;

  let intent = ctx_data.write().intent.take();
  intent.ok_or_else(|| AppError::Internal("Payment pipeline completed without an intent.".to_string()))
}
