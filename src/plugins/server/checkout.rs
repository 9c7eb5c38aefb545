use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
};
use serde::Serialize;

use super::handlers::CurrentUser;
use crate::{
  prelude::*,
  state::AppState,
  sv::checkout::{CheckoutReq, OrderSummary},
};

#[derive(Debug, Serialize)]
pub struct CheckoutRes {
  pub status: &'static str,
  pub order: OrderSummary,
}

pub async fn checkout(
  State(app): State<Arc<AppState>>,
  CurrentUser(id): CurrentUser,
  req: Result<Json<CheckoutReq>, JsonRejection>,
) -> Result<(StatusCode, Json<CheckoutRes>)> {
  let Json(req) = req.map_err(|err| Error::Invalid(err.body_text()))?;
  let order = app.sv().checkout.checkout(id, req).await?;
  Ok((StatusCode::CREATED, Json(CheckoutRes { status: "success", order })))
}
