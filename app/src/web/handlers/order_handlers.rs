// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::order_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct PlaceOrderRequestPayload {
  pub address_id: Uuid,
}

#[instrument(
    name = "handler::place_order",
    skip(app_state, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, address_id = %req_payload.address_id)
)]
pub async fn place_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<PlaceOrderRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let order = order_service::place_order(&app_state, auth_user.user_id, req_payload.address_id).await?;
  info!(
    "Order {} placed by user {} for {}.",
    order.id, auth_user.user_id, order.total_amount
  );
  Ok(HttpResponse::Created().json(json!({ "order": order })))
}

#[instrument(name = "handler::list_orders", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = order_service::list_orders(&app_state, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(
    name = "handler::get_order",
    skip(app_state, auth_user),
    fields(user_id = %auth_user.user_id, order_id = %order_id)
)]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  order_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let order = order_service::get_order(&app_state, auth_user.user_id, order_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "order": order })))
}
