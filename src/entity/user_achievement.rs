use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-user progression of an achievement. Variants are declared in the
/// only order a row may move through.
#[derive(
  Clone,
  Copy,
  Debug,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  EnumIter,
  DeriveActiveEnum,
  Serialize,
  Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum AchievementState {
  #[sea_orm(string_value = "locked")]
  Locked,
  #[sea_orm(string_value = "available")]
  Available,
  #[sea_orm(string_value = "unlocked")]
  Unlocked,
  #[sea_orm(string_value = "claimed")]
  Claimed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_achievements")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub user_id: i32,
  #[sea_orm(primary_key, auto_increment = false)]
  pub achievement_id: i32,
  pub state: AchievementState,
  pub progress: i64,
  pub claimed_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::user::Entity",
    from = "Column::UserId",
    to = "super::user::Column::Id",
    on_delete = "Cascade"
  )]
  User,
  #[sea_orm(
    belongs_to = "super::achievement::Entity",
    from = "Column::AchievementId",
    to = "super::achievement::Column::Id",
    on_delete = "Cascade"
  )]
  Achievement,
}

impl Related<super::user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::User.def()
  }
}

impl Related<super::achievement::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Achievement.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
