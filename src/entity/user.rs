use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Loyalty tier; higher tiers get a larger checkout discount.
#[derive(
  Clone,
  Copy,
  Debug,
  Default,
  PartialEq,
  Eq,
  EnumIter,
  DeriveActiveEnum,
  Serialize,
  Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum UserLevel {
  #[sea_orm(string_value = "guest")]
  Guest,
  #[default]
  #[sea_orm(string_value = "standard")]
  Standard,
  #[sea_orm(string_value = "silver")]
  #[serde(alias = "user_silver")]
  Silver,
  #[sea_orm(string_value = "gold")]
  #[serde(alias = "user_gold")]
  Gold,
  #[sea_orm(string_value = "platinum")]
  #[serde(alias = "user_platinum")]
  Platinum,
}

impl UserLevel {
  /// Share of the subtotal taken off at checkout.
  pub fn discount_rate(self) -> f64 {
    match self {
      Self::Guest | Self::Standard => 0.0,
      Self::Silver => 0.01,
      Self::Gold => 0.05,
      Self::Platinum => 0.10,
    }
  }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub username: String,
  pub avatar_url: Option<String>,
  pub level: UserLevel,
  pub gems: i64,
  pub xp: i64,
  pub pulls_count: i32,
  pub money_spent: f64,
  pub added_wishlist: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::order::Entity")]
  Orders,
  #[sea_orm(has_many = "super::user_coupon::Entity")]
  Coupons,
  #[sea_orm(has_many = "super::user_badge::Entity")]
  Badges,
  #[sea_orm(has_many = "super::user_achievement::Entity")]
  Achievements,
}

impl Related<super::order::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Orders.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
