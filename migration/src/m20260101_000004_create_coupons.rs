use sea_orm_migration::prelude::*;

use super::m20260101_000001_create_users::Users;
use crate::{COUPON_RARITIES, one_of};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Coupons::Table)
          .if_not_exists()
          .col(ColumnDef::new(Coupons::Id).integer().not_null().primary_key())
          .col(ColumnDef::new(Coupons::Name).string().not_null())
          .col(
            ColumnDef::new(Coupons::Rarity)
              .string()
              .not_null()
              .check(one_of(Coupons::Rarity, COUPON_RARITIES)),
          )
          .col(ColumnDef::new(Coupons::Description).text().not_null())
          .col(ColumnDef::new(Coupons::ImageUrl).string().not_null())
          .col(
            ColumnDef::new(Coupons::Value)
              .integer()
              .not_null()
              .check(Expr::col(Coupons::Value).gte(0)),
          )
          .col(
            ColumnDef::new(Coupons::Type)
              .string()
              .not_null()
              .check(one_of(Coupons::Type, &["flat", "percentage", "dud"])),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_coupons_rarity")
          .table(Coupons::Table)
          .col(Coupons::Rarity)
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(UserCoupons::Table)
          .if_not_exists()
          .col(ColumnDef::new(UserCoupons::UserId).integer().not_null())
          .col(ColumnDef::new(UserCoupons::CouponId).integer().not_null())
          .col(
            ColumnDef::new(UserCoupons::Quantity)
              .integer()
              .not_null()
              .default(1)
              .check(Expr::col(UserCoupons::Quantity).gte(0)),
          )
          .primary_key(
            Index::create().col(UserCoupons::UserId).col(UserCoupons::CouponId),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_user_coupons_user")
              .from(UserCoupons::Table, UserCoupons::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_user_coupons_coupon")
              .from(UserCoupons::Table, UserCoupons::CouponId)
              .to(Coupons::Table, Coupons::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(UserCoupons::Table).to_owned())
      .await?;
    manager.drop_table(Table::drop().table(Coupons::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Coupons {
  Table,
  Id,
  Name,
  Rarity,
  Description,
  ImageUrl,
  Value,
  Type,
}

#[derive(DeriveIden)]
pub enum UserCoupons {
  Table,
  UserId,
  CouponId,
  Quantity,
}
