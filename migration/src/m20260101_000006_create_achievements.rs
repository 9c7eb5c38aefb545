use sea_orm_migration::prelude::*;

use super::{
  m20260101_000001_create_users::Users,
  m20260101_000004_create_coupons::Coupons,
  m20260101_000005_create_badges::Badges,
};
use crate::{USER_LEVELS, one_of};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Achievements::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Achievements::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Achievements::Title).string().not_null())
          .col(ColumnDef::new(Achievements::Description).text().not_null())
          .col(ColumnDef::new(Achievements::RewardInfo).string().null())
          .col(ColumnDef::new(Achievements::RequiredId).integer().null())
          .col(ColumnDef::new(Achievements::Condition).json().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_achievements_required")
              .from(Achievements::Table, Achievements::RequiredId)
              .to(Achievements::Table, Achievements::Id)
              .on_delete(ForeignKeyAction::SetNull),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(AchievementRewards::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(AchievementRewards::AchievementId)
              .integer()
              .not_null()
              .primary_key(),
          )
          .col(ColumnDef::new(AchievementRewards::Xp).big_integer().null())
          .col(ColumnDef::new(AchievementRewards::Gems).big_integer().null())
          .col(ColumnDef::new(AchievementRewards::CouponId).integer().null())
          .col(ColumnDef::new(AchievementRewards::AwardBadgeId).string().null())
          .col(
            ColumnDef::new(AchievementRewards::AccountUpgrade)
              .string()
              .null()
              .check(one_of(AchievementRewards::AccountUpgrade, USER_LEVELS)),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_achievement_rewards_achievement")
              .from(AchievementRewards::Table, AchievementRewards::AchievementId)
              .to(Achievements::Table, Achievements::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_achievement_rewards_coupon")
              .from(AchievementRewards::Table, AchievementRewards::CouponId)
              .to(Coupons::Table, Coupons::Id)
              .on_delete(ForeignKeyAction::SetNull),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_achievement_rewards_badge")
              .from(AchievementRewards::Table, AchievementRewards::AwardBadgeId)
              .to(Badges::Table, Badges::Id)
              .on_delete(ForeignKeyAction::SetNull),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(UserAchievements::Table)
          .if_not_exists()
          .col(ColumnDef::new(UserAchievements::UserId).integer().not_null())
          .col(
            ColumnDef::new(UserAchievements::AchievementId).integer().not_null(),
          )
          .col(
            ColumnDef::new(UserAchievements::State)
              .string()
              .not_null()
              .default("locked")
              .check(one_of(
                UserAchievements::State,
                &["locked", "available", "unlocked", "claimed"],
              )),
          )
          .col(
            ColumnDef::new(UserAchievements::Progress)
              .big_integer()
              .not_null()
              .default(0)
              .check(Expr::col(UserAchievements::Progress).gte(0)),
          )
          .col(ColumnDef::new(UserAchievements::ClaimedAt).date_time().null())
          .primary_key(
            Index::create()
              .col(UserAchievements::UserId)
              .col(UserAchievements::AchievementId),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_user_achievements_user")
              .from(UserAchievements::Table, UserAchievements::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_user_achievements_achievement")
              .from(UserAchievements::Table, UserAchievements::AchievementId)
              .to(Achievements::Table, Achievements::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(UserAchievements::Table).to_owned())
      .await?;
    manager
      .drop_table(Table::drop().table(AchievementRewards::Table).to_owned())
      .await?;
    manager
      .drop_table(Table::drop().table(Achievements::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Achievements {
  Table,
  Id,
  Title,
  Description,
  RewardInfo,
  RequiredId,
  Condition,
}

#[derive(DeriveIden)]
pub enum AchievementRewards {
  Table,
  AchievementId,
  Xp,
  Gems,
  CouponId,
  AwardBadgeId,
  AccountUpgrade,
}

#[derive(DeriveIden)]
pub enum UserAchievements {
  Table,
  UserId,
  AchievementId,
  State,
  Progress,
  ClaimedAt,
}
