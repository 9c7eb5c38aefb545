use sea_orm_migration::prelude::*;

use crate::{USER_LEVELS, one_of};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Users::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Users::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(Users::Username)
              .string()
              .not_null()
              .default("Bob"),
          )
          .col(ColumnDef::new(Users::AvatarUrl).string().null())
          .col(
            ColumnDef::new(Users::Level)
              .string()
              .not_null()
              .default("standard")
              .check(one_of(Users::Level, USER_LEVELS)),
          )
          .col(
            ColumnDef::new(Users::Gems)
              .big_integer()
              .not_null()
              .default(0)
              .check(Expr::col(Users::Gems).gte(0)),
          )
          .col(
            ColumnDef::new(Users::Xp)
              .big_integer()
              .not_null()
              .default(0)
              .check(Expr::col(Users::Xp).gte(0)),
          )
          .col(
            ColumnDef::new(Users::PullsCount)
              .integer()
              .not_null()
              .default(0)
              .check(Expr::col(Users::PullsCount).gte(0)),
          )
          .col(
            ColumnDef::new(Users::MoneySpent)
              .double()
              .not_null()
              .default(0.0)
              .check(Expr::col(Users::MoneySpent).gte(0)),
          )
          .col(
            ColumnDef::new(Users::AddedWishlist)
              .boolean()
              .not_null()
              .default(false),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Users {
  Table,
  Id,
  Username,
  AvatarUrl,
  Level,
  Gems,
  Xp,
  PullsCount,
  MoneySpent,
  AddedWishlist,
}
