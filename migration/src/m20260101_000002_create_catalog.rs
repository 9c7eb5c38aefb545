use sea_orm_migration::prelude::*;

use crate::one_of;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Categories::Table)
          .if_not_exists()
          .col(ColumnDef::new(Categories::Id).string().not_null().primary_key())
          .col(ColumnDef::new(Categories::Name).string().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(Products::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Products::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Products::Title).string().not_null())
          .col(ColumnDef::new(Products::Brand).string().not_null())
          .col(
            ColumnDef::new(Products::Price)
              .double()
              .not_null()
              .check(Expr::col(Products::Price).gte(0)),
          )
          .col(ColumnDef::new(Products::Description).text().not_null())
          .col(ColumnDef::new(Products::CategoryId).string().not_null())
          .col(ColumnDef::new(Products::ImageUrl).string().not_null())
          .col(ColumnDef::new(Products::RatingScore).double().not_null())
          .col(ColumnDef::new(Products::RatingCount).integer().not_null())
          .col(
            ColumnDef::new(Products::Status)
              .string()
              .not_null()
              .check(one_of(
                Products::Status,
                &["in-stock", "sold-out", "pre-order"],
              )),
          )
          .col(ColumnDef::new(Products::Stock).integer().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_products_category")
          .table(Products::Table)
          .col(Products::CategoryId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Products::Table).to_owned()).await?;
    manager.drop_table(Table::drop().table(Categories::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Categories {
  Table,
  Id,
  Name,
}

#[derive(DeriveIden)]
pub enum Products {
  Table,
  Id,
  Title,
  Brand,
  Price,
  Description,
  CategoryId,
  ImageUrl,
  RatingScore,
  RatingCount,
  Status,
  Stock,
}
