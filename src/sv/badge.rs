use sea_orm::DbErr;
use serde::Serialize;

use crate::{
  entity::{badge, user_badge},
  prelude::*,
};

#[derive(Debug, Serialize)]
pub struct UnlockedBadge {
  #[serde(flatten)]
  pub badge: badge::Model,
  pub date_received: DateTime,
}

pub struct Badge<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Badge<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn all(&self) -> Result<Vec<badge::Model>> {
    Ok(badge::Entity::find().order_by_asc(badge::Column::Id).all(self.db).await?)
  }

  pub async fn unlocked(&self, user_id: i32) -> Result<Vec<UnlockedBadge>> {
    let badges = user_badge::Entity::find()
      .filter(user_badge::Column::UserId.eq(user_id))
      .order_by_asc(user_badge::Column::DateReceived)
      .find_also_related(badge::Entity)
      .all(self.db)
      .await?
      .into_iter()
      .filter_map(|(held, badge)| {
        let date_received = held.date_received;
        badge.map(|badge| UnlockedBadge { badge, date_received })
      })
      .collect();
    Ok(badges)
  }

  pub async fn locked(&self, user_id: i32) -> Result<Vec<badge::Model>> {
    let held: Vec<String> = user_badge::Entity::find()
      .filter(user_badge::Column::UserId.eq(user_id))
      .all(self.db)
      .await?
      .into_iter()
      .map(|held| held.badge_id)
      .collect();

    let badges = badge::Entity::find()
      .filter(badge::Column::Id.is_not_in(held))
      .order_by_asc(badge::Column::Id)
      .all(self.db)
      .await?;
    Ok(badges)
  }

  /// Awards a badge once; returns `false` if the user already had it.
  pub async fn grant<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    badge_id: &str,
  ) -> Result<bool, DbErr> {
    let held = user_badge::Entity::find_by_id((user_id, badge_id.to_string()))
      .one(conn)
      .await?;
    if held.is_some() {
      return Ok(false);
    }

    user_badge::ActiveModel {
      user_id: Set(user_id),
      badge_id: Set(badge_id.to_string()),
      date_received: Set(Utc::now().naive_utc()),
    }
    .insert(conn)
    .await?;

    Ok(true)
  }
}
