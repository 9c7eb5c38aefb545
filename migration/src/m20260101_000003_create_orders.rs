use sea_orm_migration::prelude::*;

use super::{
  m20260101_000001_create_users::Users,
  m20260101_000002_create_catalog::Products,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Orders::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Orders::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Orders::UserId).integer().not_null())
          .col(ColumnDef::new(Orders::OrderDate).date_time().not_null())
          .col(
            ColumnDef::new(Orders::OrderTotal)
              .double()
              .not_null()
              .check(Expr::col(Orders::OrderTotal).gte(0)),
          )
          .col(
            ColumnDef::new(Orders::Status)
              .string()
              .not_null()
              .default("processing"),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_orders_user")
              .from(Orders::Table, Orders::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Restrict),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_orders_user")
          .table(Orders::Table)
          .col(Orders::UserId)
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(OrderItems::Table)
          .if_not_exists()
          .col(ColumnDef::new(OrderItems::OrderId).integer().not_null())
          .col(ColumnDef::new(OrderItems::ProductId).integer().not_null())
          .col(
            ColumnDef::new(OrderItems::Quantity)
              .integer()
              .not_null()
              .default(1)
              .check(Expr::col(OrderItems::Quantity).gt(0)),
          )
          .primary_key(
            Index::create().col(OrderItems::OrderId).col(OrderItems::ProductId),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_order_items_order")
              .from(OrderItems::Table, OrderItems::OrderId)
              .to(Orders::Table, Orders::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_order_items_product")
              .from(OrderItems::Table, OrderItems::ProductId)
              .to(Products::Table, Products::Id)
              .on_delete(ForeignKeyAction::Restrict),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(OrderItems::Table).to_owned())
      .await?;
    manager.drop_table(Table::drop().table(Orders::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Orders {
  Table,
  Id,
  UserId,
  OrderDate,
  OrderTotal,
  Status,
}

#[derive(DeriveIden)]
pub enum OrderItems {
  Table,
  OrderId,
  ProductId,
  Quantity,
}
