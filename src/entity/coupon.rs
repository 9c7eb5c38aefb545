use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Gacha rarity tier of a coupon.
#[derive(
  Clone,
  Copy,
  Debug,
  PartialEq,
  Eq,
  Hash,
  EnumIter,
  DeriveActiveEnum,
  Serialize,
  Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
  #[sea_orm(string_value = "common")]
  Common,
  #[sea_orm(string_value = "rare")]
  Rare,
  #[sea_orm(string_value = "super_rare")]
  SuperRare,
  #[sea_orm(string_value = "ultra_rare")]
  UltraRare,
}

#[derive(
  Clone,
  Copy,
  Debug,
  PartialEq,
  Eq,
  EnumIter,
  DeriveActiveEnum,
  Serialize,
  Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum CouponType {
  /// Fixed amount off the subtotal
  #[sea_orm(string_value = "flat")]
  Flat,
  /// `value` percent off the subtotal
  #[sea_orm(string_value = "percentage")]
  Percentage,
  /// Blank prize, never redeemable
  #[sea_orm(string_value = "dud")]
  Dud,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: i32,
  pub name: String,
  pub rarity: Rarity,
  pub description: String,
  pub image_url: String,
  pub value: i32,
  #[sea_orm(column_name = "type")]
  #[serde(rename = "type")]
  pub kind: CouponType,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::user_coupon::Entity")]
  Owners,
}

impl ActiveModelBehavior for ActiveModel {}
