use sea_orm_migration::prelude::*;

use super::m20260101_000001_create_users::Users;
use crate::one_of;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Badges::Table)
          .if_not_exists()
          .col(ColumnDef::new(Badges::Id).string().not_null().primary_key())
          .col(ColumnDef::new(Badges::Title).string().not_null())
          .col(ColumnDef::new(Badges::ImageUrl).string().not_null())
          .col(ColumnDef::new(Badges::Description).text().not_null())
          .col(
            ColumnDef::new(Badges::Rarity).string().not_null().check(one_of(
              Badges::Rarity,
              &["common", "rare", "super_rare", "ultra_rare", "super_ultra_rare"],
            )),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(UserBadges::Table)
          .if_not_exists()
          .col(ColumnDef::new(UserBadges::UserId).integer().not_null())
          .col(ColumnDef::new(UserBadges::BadgeId).string().not_null())
          .col(ColumnDef::new(UserBadges::DateReceived).date_time().not_null())
          .primary_key(
            Index::create().col(UserBadges::UserId).col(UserBadges::BadgeId),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_user_badges_user")
              .from(UserBadges::Table, UserBadges::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_user_badges_badge")
              .from(UserBadges::Table, UserBadges::BadgeId)
              .to(Badges::Table, Badges::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(UserBadges::Table).to_owned())
      .await?;
    manager.drop_table(Table::drop().table(Badges::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Badges {
  Table,
  Id,
  Title,
  ImageUrl,
  Description,
  Rarity,
}

#[derive(DeriveIden)]
pub enum UserBadges {
  Table,
  UserId,
  BadgeId,
  DateReceived,
}
