// storefront/src/web/routes.rs

use crate::errors::AppError;
use crate::web::handlers::{cart_handlers, order_handlers, payment_handlers};
use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{web, HttpRequest};
use tracing::warn;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
  warn!("Rejected request body for {}: {}", req.path(), err);
  AppError::Validation(format!("Invalid request body: {}", err)).into()
}

fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
  warn!("Rejected path {}: {}", req.path(), err);
  AppError::Validation(format!("Invalid path parameter: {}", err)).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  // Extraction failures get the same JSON error body as every other failure.
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::PathConfig::default().error_handler(path_error_handler));

  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::get_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/items", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/items/{item_id}", web::put().to(cart_handlers::update_cart_item_handler))
          .route("/items/{item_id}", web::patch().to(cart_handlers::update_cart_item_handler))
          .route("/items/{item_id}", web::delete().to(cart_handlers::remove_cart_item_handler)),
      )
      .service(
        web::scope("/orders")
          .route("", web::post().to(order_handlers::place_order_handler))
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route("/{order_id}", web::get().to(order_handlers::get_order_handler)),
      )
      .service(
        web::scope("/payments").route(
          "/intents",
          web::post().to(payment_handlers::create_payment_intent_handler),
        ),
      ),
  );
}
