use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Serialize;

use super::handlers::CurrentUser;
use crate::{
  entity::{AchievementState, achievement_reward},
  prelude::*,
  state::AppState,
  sv::achievement::AchievementView,
};

#[derive(Debug, Serialize)]
pub struct ClaimRes {
  pub status: &'static str,
  pub rewards: Option<achievement_reward::Model>,
}

async fn list(
  app: &AppState,
  user_id: i32,
  state: AchievementState,
) -> Result<Json<Vec<AchievementView>>> {
  Ok(Json(app.sv().achievement.list(user_id, state).await?))
}

pub async fn available(
  State(app): State<Arc<AppState>>,
  CurrentUser(id): CurrentUser,
) -> Result<Json<Vec<AchievementView>>> {
  list(&app, id, AchievementState::Available).await
}

pub async fn unlocked(
  State(app): State<Arc<AppState>>,
  CurrentUser(id): CurrentUser,
) -> Result<Json<Vec<AchievementView>>> {
  list(&app, id, AchievementState::Unlocked).await
}

pub async fn claimed(
  State(app): State<Arc<AppState>>,
  CurrentUser(id): CurrentUser,
) -> Result<Json<Vec<AchievementView>>> {
  list(&app, id, AchievementState::Claimed).await
}

pub async fn claim(
  State(app): State<Arc<AppState>>,
  CurrentUser(user_id): CurrentUser,
  Path(id): Path<i32>,
) -> Result<Json<ClaimRes>> {
  let rewards = app.sv().achievement.claim(user_id, id).await?;
  Ok(Json(ClaimRes { status: "ok", rewards }))
}
