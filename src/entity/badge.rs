use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

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
pub enum BadgeRarity {
  #[sea_orm(string_value = "common")]
  Common,
  #[sea_orm(string_value = "rare")]
  Rare,
  #[sea_orm(string_value = "super_rare")]
  SuperRare,
  #[sea_orm(string_value = "ultra_rare")]
  UltraRare,
  #[sea_orm(string_value = "super_ultra_rare")]
  SuperUltraRare,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "badges")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  pub title: String,
  pub image_url: String,
  pub description: String,
  pub rarity: BadgeRarity,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::user_badge::Entity")]
  Holders,
}

impl Related<super::user_badge::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Holders.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
