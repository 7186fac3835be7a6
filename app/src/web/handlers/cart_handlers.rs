// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::cart_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  pub product_id: Uuid,
  pub quantity: i32,
}

#[derive(Deserialize, Debug)]
pub struct UpdateCartItemRequestPayload {
  pub quantity: i32,
}

#[instrument(name = "handler::get_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart = cart_service::get_or_create_cart(&app_state, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "cart": cart })))
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, product_id = %req_payload.product_id, quantity = %req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<AddToCartRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let item = cart_service::add_item(
    &app_state,
    auth_user.user_id,
    req_payload.product_id,
    req_payload.quantity,
  )
  .await?;

  info!(
    "Add to cart successful for user: {}. Item ID: {}, New Quantity: {}",
    auth_user.user_id, item.id, item.quantity
  );
  Ok(HttpResponse::Created().json(json!({
      "message": "Item added to cart successfully.",
      "cartItem": item
  })))
}

#[instrument(
    name = "handler::update_cart_item",
    skip(app_state, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, item_id = %item_id, quantity = %req_payload.quantity)
)]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  item_id: web::Path<Uuid>,
  req_payload: web::Json<UpdateCartItemRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let item =
    cart_service::update_item_quantity(&app_state, auth_user.user_id, item_id.into_inner(), req_payload.quantity)
      .await?;
  Ok(HttpResponse::Ok().json(json!({ "cartItem": item })))
}

#[instrument(
    name = "handler::remove_cart_item",
    skip(app_state, auth_user),
    fields(user_id = %auth_user.user_id, item_id = %item_id)
)]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  item_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  cart_service::remove_item(&app_state, auth_user.user_id, item_id.into_inner()).await?;
  Ok(HttpResponse::NoContent().finish())
}

#[instrument(name = "handler::clear_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let removed = cart_service::clear(&app_state, auth_user.user_id).await?;
  info!("Cart cleared for user {}: {} item(s) removed.", auth_user.user_id, removed);
  Ok(HttpResponse::NoContent().finish())
}
