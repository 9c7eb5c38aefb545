use std::{convert::Infallible, sync::Arc};

use axum::{
  Json,
  extract::{FromRequestParts, Path, Query, State},
  http::request::Parts,
};
use serde::Deserialize;

use crate::{
  entity::{badge, category, order, product, user},
  prelude::*,
  state::AppState,
  sv::{badge::UnlockedBadge, inventory::OwnedCoupon, order::OrderLine},
};

/// The user a request acts on behalf of.
pub struct CurrentUser(pub i32);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
  type Rejection = Infallible;

  async fn from_request_parts(
    _parts: &mut Parts,
    app: &Arc<AppState>,
  ) -> Result<Self, Self::Rejection> {
    Ok(Self(app.config.user_id))
  }
}

pub async fn health() -> &'static str {
  "OK"
}

pub async fn me(
  State(app): State<Arc<AppState>>,
  CurrentUser(id): CurrentUser,
) -> Result<Json<user::Model>> {
  Ok(Json(app.sv().user.get(id).await?))
}

pub async fn flag_wishlist(
  State(app): State<Arc<AppState>>,
  CurrentUser(id): CurrentUser,
) -> Result<Json<user::Model>> {
  Ok(Json(app.sv().user.flag_wishlist(id).await?))
}

pub async fn categories(
  State(app): State<Arc<AppState>>,
) -> Result<Json<Vec<category::Model>>> {
  Ok(Json(app.sv().catalog.categories().await?))
}

#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
  pub category_id: Option<String>,
}

pub async fn products(
  State(app): State<Arc<AppState>>,
  Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<product::Model>>> {
  let category = query.category_id.as_deref().filter(|id| !id.is_empty());
  Ok(Json(app.sv().catalog.products(category).await?))
}

pub async fn product(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
) -> Result<Json<product::Model>> {
  Ok(Json(app.sv().catalog.product(id).await?))
}

pub async fn my_orders(
  State(app): State<Arc<AppState>>,
  CurrentUser(id): CurrentUser,
) -> Result<Json<Vec<order::Model>>> {
  Ok(Json(app.sv().order.by_user(id).await?))
}

pub async fn order_items(
  State(app): State<Arc<AppState>>,
  CurrentUser(user_id): CurrentUser,
  Path(order_id): Path<i32>,
) -> Result<Json<Vec<OrderLine>>> {
  Ok(Json(app.sv().order.lines(user_id, order_id).await?))
}

pub async fn owned_coupons(
  State(app): State<Arc<AppState>>,
  CurrentUser(id): CurrentUser,
) -> Result<Json<Vec<OwnedCoupon>>> {
  Ok(Json(app.sv().inventory.owned(id).await?))
}

pub async fn badges(
  State(app): State<Arc<AppState>>,
) -> Result<Json<Vec<badge::Model>>> {
  Ok(Json(app.sv().badge.all().await?))
}

pub async fn unlocked_badges(
  State(app): State<Arc<AppState>>,
  CurrentUser(id): CurrentUser,
) -> Result<Json<Vec<UnlockedBadge>>> {
  Ok(Json(app.sv().badge.unlocked(id).await?))
}

pub async fn locked_badges(
  State(app): State<Arc<AppState>>,
  CurrentUser(id): CurrentUser,
) -> Result<Json<Vec<badge::Model>>> {
  Ok(Json(app.sv().badge.locked(id).await?))
}
