// storefront/src/web/handlers/payment_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::payment_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct CreatePaymentIntentRequestPayload {
  pub order_id: Uuid,
}

#[instrument(
    name = "handler::create_payment_intent",
    skip(app_state, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, order_id = %req_payload.order_id)
)]
pub async fn create_payment_intent_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<CreatePaymentIntentRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let intent = payment_service::create_payment_intent(&app_state, auth_user.user_id, req_payload.order_id).await?;
  info!(
    "Payment intent {} created for order {} ({} {}).",
    intent.id, req_payload.order_id, intent.amount_minor, intent.currency
  );
  Ok(HttpResponse::Created().json(json!({
      "clientSecret": intent.client_secret,
      "paymentIntentId": intent.id,
      "amount": intent.amount_minor,
      "currency": intent.currency,
  })))
}
