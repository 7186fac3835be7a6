// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use flowline::FlowlineError;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Required: {0}")]
  Unauthenticated(String),

  /// Missing and not-owned entities are reported identically.
  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Product {product_id} is not available for purchase")]
  Unavailable { product_id: Uuid },

  #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
  InsufficientStock {
    product_id: Uuid,
    requested: i32,
    available: i32,
  },

  #[error("Cart is empty")]
  EmptyCart,

  #[error("Shipping address does not belong to the user")]
  AddressNotOwned,

  #[error("Invalid State: {0}")]
  InvalidState(String),

  #[error("Payment Provider Error: {0}")]
  Payment(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowlineError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),

  #[error("Pipeline execution was halted by a handler.")]
  PipelineHaltedByHandler,
}

impl AppError {
  fn is_internal(&self) -> bool {
    matches!(
      self,
      AppError::Config(_)
        | AppError::Sqlx(_)
        | AppError::Migration(_)
        | AppError::Workflow { .. }
        | AppError::Internal(_)
        | AppError::PipelineHaltedByHandler
    )
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::EmptyCart | AppError::AddressNotOwned => StatusCode::BAD_REQUEST,
      AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Unavailable { .. } | AppError::InsufficientStock { .. } | AppError::InvalidState(_) => {
        StatusCode::CONFLICT
      }
      AppError::Payment(_) => StatusCode::BAD_GATEWAY,
      AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Migration(_)
      | AppError::Workflow { .. }
      | AppError::Internal(_)
      | AppError::PipelineHaltedByHandler => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if self.is_internal() {
      tracing::error!(application_error = %self, "Responding with internal error");
      return HttpResponse::build(status).json(json!({"error": "An internal error occurred"}));
    }

    tracing::warn!(application_error = %self, status = status.as_u16(), "Responding with error");
    let body = match self {
      AppError::Unavailable { product_id } => json!({"error": self.to_string(), "productId": product_id}),
      AppError::InsufficientStock {
        product_id, available, ..
      } => json!({"error": self.to_string(), "productId": product_id, "available": available}),
      AppError::Payment(_) => json!({"error": "Payment provider error"}),
      _ => json!({"error": self.to_string()}),
    };
    HttpResponse::build(status).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
