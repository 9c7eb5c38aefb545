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
pub enum ProductStatus {
  #[sea_orm(string_value = "in-stock")]
  #[serde(rename = "in-stock")]
  InStock,
  #[sea_orm(string_value = "sold-out")]
  #[serde(rename = "sold-out")]
  SoldOut,
  #[sea_orm(string_value = "pre-order")]
  #[serde(rename = "pre-order")]
  PreOrder,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub title: String,
  pub brand: String,
  pub price: f64,
  pub description: String,
  pub category_id: String,
  pub image_url: String,
  pub rating_score: f64,
  pub rating_count: i32,
  pub status: ProductStatus,
  pub stock: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::order_item::Entity")]
  OrderItems,
}

impl ActiveModelBehavior for ActiveModel {}
