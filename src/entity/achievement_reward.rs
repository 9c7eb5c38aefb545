use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::UserLevel;

/// Reward bundle paid out when an achievement is claimed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "achievement_rewards")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub achievement_id: i32,
  pub xp: Option<i64>,
  pub gems: Option<i64>,
  pub coupon_id: Option<i32>,
  pub award_badge_id: Option<String>,
  pub account_upgrade: Option<UserLevel>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::achievement::Entity",
    from = "Column::AchievementId",
    to = "super::achievement::Column::Id",
    on_delete = "Cascade"
  )]
  Achievement,
  #[sea_orm(
    belongs_to = "super::coupon::Entity",
    from = "Column::CouponId",
    to = "super::coupon::Column::Id",
    on_delete = "SetNull"
  )]
  Coupon,
  #[sea_orm(
    belongs_to = "super::badge::Entity",
    from = "Column::AwardBadgeId",
    to = "super::badge::Column::Id",
    on_delete = "SetNull"
  )]
  Badge,
}

impl Related<super::achievement::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Achievement.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
