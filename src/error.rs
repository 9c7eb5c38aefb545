//! Error types for the storefront

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use sea_orm::DbErr;

use crate::entity::Rarity;

#[derive(Debug, thiserror::Error)]
pub enum Coupon {
  #[error("coupon {0} is not owned")]
  NotOwned(i32),
  #[error("order does not reach the minimum value for coupon {0}")]
  NotEligible(i32),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] DbErr),

  #[error("user {0} not found")]
  UserNotFound(i32),

  #[error("product {0} not found")]
  ProductNotFound(i32),

  #[error("order {0} not found")]
  OrderNotFound(i32),

  #[error("not enough stock for product {0}")]
  InsufficientStock(i32),

  #[error("not enough gems: {required} required, {balance} available")]
  InsufficientGems { required: i64, balance: i64 },

  #[error(transparent)]
  Coupon(#[from] Coupon),

  #[error("achievement {0} is not claimable")]
  NotClaimable(i32),

  #[error("reward disbursement rolled back: {0}")]
  Disbursement(DbErr),

  #[error("no coupons of rarity {0:?} in the catalog")]
  EmptyTier(Rarity),

  #[error("payment was not approved")]
  PaymentDeclined,

  #[error("invalid request: {0}")]
  Invalid(String),

  #[error("cannot pull {0} times, only 1 or 10")]
  InvalidRollCount(u32),

  #[error("invalid seed data: {0}")]
  Seed(String),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
}

impl Error {
  /// Machine-readable code sent to clients.
  pub fn code(&self) -> &'static str {
    match self {
      Error::Database(_) | Error::Io(_) | Error::Seed(_) => "STORAGE_ERROR",
      Error::UserNotFound(_) => "USER_NOT_FOUND",
      Error::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
      Error::OrderNotFound(_) => "ORDER_NOT_FOUND",
      Error::InsufficientStock(_) => "INSUFFICIENT_STOCK",
      Error::InsufficientGems { .. } => "INSUFFICIENT_GEMS",
      Error::Coupon(Coupon::NotOwned(_)) => "COUPON_NOT_OWNED",
      Error::Coupon(Coupon::NotEligible(_)) => "COUPON_NOT_ELIGIBLE",
      Error::NotClaimable(_) => "ACHIEVEMENT_NOT_CLAIMABLE",
      Error::Disbursement(_) => "DISBURSEMENT_FAILED",
      Error::EmptyTier(_) => "EMPTY_RARITY_TIER",
      Error::PaymentDeclined => "PAYMENT_FAILED",
      Error::Invalid(_) => "INVALID_REQUEST",
      Error::InvalidRollCount(_) => "INVALID_ROLL_COUNT",
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Error::UserNotFound(_)
      | Error::ProductNotFound(_)
      | Error::OrderNotFound(_) => StatusCode::NOT_FOUND,
      Error::InsufficientStock(_)
      | Error::InsufficientGems { .. }
      | Error::Coupon(_)
      | Error::NotClaimable(_) => StatusCode::CONFLICT,
      Error::Invalid(_) | Error::InvalidRollCount(_) => {
        StatusCode::BAD_REQUEST
      }
      Error::PaymentDeclined => StatusCode::PAYMENT_REQUIRED,
      Error::EmptyTier(_) => StatusCode::SERVICE_UNAVAILABLE,
      Error::Database(_)
      | Error::Disbursement(_)
      | Error::Seed(_)
      | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();

    // storage details stay in the log
    let message = if status.is_server_error() {
      tracing::error!("request failed: {self}");
      "Internal error".to_string()
    } else {
      self.to_string()
    };

    let body = json::json!({
      "status": "error",
      "code": self.code(),
      "error": message,
    });

    (status, Json(body)).into_response()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_codes_and_statuses() {
    let err = Error::Coupon(Coupon::NotEligible(4));
    assert_eq!(err.code(), "COUPON_NOT_ELIGIBLE");
    assert_eq!(err.status(), StatusCode::CONFLICT);

    let err = Error::InsufficientGems { required: 500, balance: 20 };
    assert_eq!(err.code(), "INSUFFICIENT_GEMS");
    assert_eq!(err.to_string(), "not enough gems: 500 required, 20 available");

    let err = Error::Disbursement(DbErr::Custom("boom".into()));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(Error::ProductNotFound(9).status(), StatusCode::NOT_FOUND);
  }
}
