use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};

use super::handlers::CurrentUser;
use crate::{
  prelude::*,
  state::AppState,
  sv::gacha::{Prize, Pull},
};

pub async fn single(
  State(app): State<Arc<AppState>>,
  CurrentUser(id): CurrentUser,
) -> Result<Json<Prize>> {
  Ok(Json(app.sv().gacha.pull(id, Pull::Single).await?))
}

pub async fn ten(
  State(app): State<Arc<AppState>>,
  CurrentUser(id): CurrentUser,
) -> Result<Json<Prize>> {
  Ok(Json(app.sv().gacha.pull(id, Pull::Ten).await?))
}

pub async fn roll(
  State(app): State<Arc<AppState>>,
  CurrentUser(id): CurrentUser,
  Path(count): Path<u32>,
) -> Result<Json<Prize>> {
  let pull = Pull::try_from(count)?;
  Ok(Json(app.sv().gacha.pull(id, pull).await?))
}
