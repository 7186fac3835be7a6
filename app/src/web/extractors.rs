// storefront/src/web/extractors.rs

use crate::errors::AppError;
use crate::models::UserId;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;
use uuid::Uuid;

/// Header carrying the caller's identity, set by the authenticating gateway.
pub const USER_ID_HEADER: &str = "X-User-ID";

/// The authenticated caller. Handlers pass `user_id` explicitly into every
/// core operation.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
  pub user_id: UserId,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let user_id = req
      .headers()
      .get(USER_ID_HEADER)
      .and_then(|value| value.to_str().ok())
      .and_then(|value| Uuid::parse_str(value.trim()).ok());

    match user_id {
      Some(user_id) => ready(Ok(AuthenticatedUser {
        user_id: UserId(user_id),
      })),
      None => {
        warn!("AuthenticatedUser extractor: Missing or invalid {} header.", USER_ID_HEADER);
        ready(Err(AppError::Unauthenticated(format!(
          "Missing or invalid {} header.",
          USER_ID_HEADER
        ))))
      }
    }
  }
}
