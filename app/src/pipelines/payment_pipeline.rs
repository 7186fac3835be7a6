// storefront/src/pipelines/payment_pipeline.rs

//! Payment intent initiation. Reads the order, never changes it; the status
//! moves on only when the provider later confirms payment.

use crate::errors::AppError;
use crate::pipelines::contexts::PaymentIntentCtxData;
use crate::services::money;
use crate::services::payments::PaymentIntentRequest;
use flowline::{ContextData, Flowline, Pipeline, PipelineControl};
use std::collections::BTreeMap;
use tracing::{info, warn};

pub fn register_payment_pipeline(registry: &Flowline<AppError>) {
  registry.register_pipeline(build_payment_intent_pipeline());
  info!("Payment intent pipeline registered.");
}

pub fn build_payment_intent_pipeline() -> Pipeline<PaymentIntentCtxData, AppError> {
  let mut p = Pipeline::<PaymentIntentCtxData, AppError>::new(&[
    ("load_order", false, None),
    ("check_payment_eligibility", false, None),
    ("compute_charge_amount", false, None),
    ("create_provider_intent", false, None),
  ]);

  // Step 1: Orders of other users are reported as missing.
  p.on("load_order", |ctx_data: ContextData<PaymentIntentCtxData>| {
    Box::pin(async move {
      let (store, user_id, order_id) = {
        let guard = ctx_data.read();
        (guard.app_state.store.clone(), guard.user_id, guard.order_id)
      };

      let Some(order) = store.find_order(user_id, order_id).await? else {
        warn!("Payment Pipeline: Order {} not found for user {}.", order_id, user_id);
        return Err(AppError::NotFound(format!("Order {} not found", order_id)));
      };
      ctx_data.write().order = Some(order);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 2: Only pending orders may start a payment.
  p.on("check_payment_eligibility", |ctx_data: ContextData<PaymentIntentCtxData>| {
    Box::pin(async move {
      let status = { ctx_data.read().order.as_ref().map(|o| o.status) };
      let status = status.ok_or_else(|| AppError::Internal("eligibility checked before load_order".to_string()))?;
      if !status.is_payable() {
        warn!("Payment Pipeline: Order is {:?}, not payable.", status);
        return Err(AppError::InvalidState(format!(
          "Order is {:?}; only pending orders can be paid",
          status
        )));
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 3: Stored total to integer minor units, never rounded.
  p.on("compute_charge_amount", |ctx_data: ContextData<PaymentIntentCtxData>| {
    Box::pin(async move {
      let (total, exponent) = {
        let guard = ctx_data.read();
        let total = guard.order.as_ref().map(|o| o.total_amount);
        (total, guard.app_state.config.payment_currency_exponent)
      };
      let total = total.ok_or_else(|| AppError::Internal("amount computed before load_order".to_string()))?;

      let amount_minor = money::to_minor_units(total, exponent)?;
      info!("Payment Pipeline: Charge amount {} -> {} minor units.", total, amount_minor);
      ctx_data.write().amount_minor = Some(amount_minor);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 4: Delegate to the provider.
  p.on("create_provider_intent", |ctx_data: ContextData<PaymentIntentCtxData>| {
    Box::pin(async move {
      let (payments, request) = {
        let guard = ctx_data.read();
        let amount_minor = guard
          .amount_minor
          .ok_or_else(|| AppError::Internal("intent created before compute_charge_amount".to_string()))?;
        let metadata = BTreeMap::from([
          ("order_id".to_string(), guard.order_id.to_string()),
          ("user_id".to_string(), guard.user_id.to_string()),
        ]);
        let request = PaymentIntentRequest {
          amount_minor,
          currency: guard.app_state.config.payment_currency.clone(),
          metadata,
        };
        (guard.app_state.payments.clone(), request)
      };

      let intent = payments.create_intent(request).await?;
      info!("Payment Pipeline: Payment intent {} created.", intent.id);
      ctx_data.write().intent = Some(intent);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p
}
