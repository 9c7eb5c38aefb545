//! Reward disbursement shared by achievements.
//!
//! Every grant of a reward bundle lands in one transaction: either the
//! user receives all of it or none of it.

use sea_orm::{DbErr, sea_query::Expr};

use crate::{
  entity::{achievement_reward, user},
  prelude::*,
  sv,
};

pub struct Reward<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Reward<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Settles a claim: pays out `reward`, if any, and moves the achievement
  /// from `unlocked` to `claimed` in one transaction. Nothing is written
  /// when either step fails.
  pub async fn disburse(
    &self,
    user_id: i32,
    achievement_id: i32,
    reward: Option<&achievement_reward::Model>,
  ) -> Result<()> {
    let txn = self.db.begin().await?;
    if let Some(reward) = reward {
      Self::apply(&txn, user_id, reward)
        .await
        .map_err(Error::Disbursement)?;
    }

    let claimed = sv::Achievement::mark_claimed(&txn, user_id, achievement_id)
      .await
      .map_err(Error::Disbursement)?;
    if !claimed {
      return Err(Error::NotClaimable(achievement_id));
    }
    txn.commit().await.map_err(Error::Disbursement)?;
    Ok(())
  }

  /// Applies every grant of `reward` on `conn`. Callers own the
  /// transaction; an error leaves it to be rolled back.
  pub async fn apply<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    reward: &achievement_reward::Model,
  ) -> Result<(), DbErr> {
    let gems = reward.gems.unwrap_or(0);
    let xp = reward.xp.unwrap_or(0);

    let res = user::Entity::update_many()
      .col_expr(user::Column::Gems, Expr::col(user::Column::Gems).add(gems))
      .col_expr(user::Column::Xp, Expr::col(user::Column::Xp).add(xp))
      .filter(user::Column::Id.eq(user_id))
      .exec(conn)
      .await?;

    if res.rows_affected == 0 {
      return Err(DbErr::RecordNotFound(format!("user {user_id}")));
    }

    if let Some(coupon_id) = reward.coupon_id {
      sv::Inventory::grant(conn, user_id, coupon_id).await?;
    }

    if let Some(badge_id) = &reward.award_badge_id
      && !sv::Badge::grant(conn, user_id, badge_id).await?
    {
      debug!("user {user_id} already holds badge {badge_id}");
    }

    // applied literally, a lower level is a downgrade
    if let Some(level) = reward.account_upgrade {
      user::Entity::update_many()
        .col_expr(user::Column::Level, Expr::value(level))
        .filter(user::Column::Id.eq(user_id))
        .exec(conn)
        .await?;
    }

    info!(
      "disbursed reward of achievement {} to user {user_id}",
      reward.achievement_id
    );
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    entity::*,
    sv::{Achievement, Badge, Inventory, testing::*},
  };

  async fn pay(
    db: &DatabaseConnection,
    user_id: i32,
    reward: &achievement_reward::Model,
  ) -> Result<(), DbErr> {
    let txn = db.begin().await?;
    Reward::apply(&txn, user_id, reward).await?;
    txn.commit().await
  }

  #[tokio::test]
  async fn test_disburse_full_bundle() {
    let db = setup_test_db().await;
    user(&db, 1, 100).await;
    coupon(&db, 7, Rarity::Rare, CouponType::Flat, 5).await;
    badge(&db, "collector").await;

    let reward = achievement_reward::Model {
      xp: Some(250),
      gems: Some(40),
      coupon_id: Some(7),
      award_badge_id: Some("collector".into()),
      account_upgrade: Some(UserLevel::Gold),
      ..reward(1)
    };

    pay(&db, 1, &reward).await.unwrap();

    let after = fetch_user(&db, 1).await;
    assert_eq!(after.gems, 140);
    assert_eq!(after.xp, 250);
    assert_eq!(after.level, UserLevel::Gold);
    assert_eq!(Inventory::new(&db).quantity(1, 7).await.unwrap(), 1);
    assert_eq!(Badge::new(&db).unlocked(1).await.unwrap().len(), 1);

    // second payout stacks coupons but keeps a single badge
    pay(&db, 1, &reward).await.unwrap();
    assert_eq!(Inventory::new(&db).quantity(1, 7).await.unwrap(), 2);
    assert_eq!(Badge::new(&db).unlocked(1).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_tier_grant_is_literal() {
    let db = setup_test_db().await;
    user(&db, 1, 0).await;
    set_level(&db, 1, UserLevel::Platinum).await;

    let reward = achievement_reward::Model {
      account_upgrade: Some(UserLevel::Silver),
      ..reward(1)
    };
    pay(&db, 1, &reward).await.unwrap();

    assert_eq!(fetch_user(&db, 1).await.level, UserLevel::Silver);
  }

  #[tokio::test]
  async fn test_failed_grant_rolls_back_everything() {
    let db = setup_test_db().await;
    user(&db, 1, 100).await;
    coupon(&db, 7, Rarity::Rare, CouponType::Flat, 5).await;

    let reward = achievement_reward::Model {
      xp: Some(250),
      gems: Some(40),
      coupon_id: Some(7),
      award_badge_id: Some("missing-badge".into()),
      account_upgrade: Some(UserLevel::Platinum),
      ..reward(1)
    };

    assert!(pay(&db, 1, &reward).await.is_err());

    let after = fetch_user(&db, 1).await;
    assert_eq!(after.gems, 100);
    assert_eq!(after.xp, 0);
    assert_eq!(after.level, UserLevel::Standard);
    assert_eq!(Inventory::new(&db).quantity(1, 7).await.unwrap(), 0);
    assert!(Badge::new(&db).unlocked(1).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_unknown_user() {
    let db = setup_test_db().await;

    let reward = achievement_reward::Model { gems: Some(10), ..reward(1) };
    assert!(matches!(
      pay(&db, 42, &reward).await,
      Err(DbErr::RecordNotFound(_))
    ));
  }

  #[tokio::test]
  async fn test_disburse_settles_claim_once() {
    let db = setup_test_db().await;
    user(&db, 1, 0).await;
    achievement(&db, 1, None, Attribute::Gems, Target::Threshold(0.0)).await;
    Achievement::new(&db).sync(1).await.unwrap();

    let reward = achievement_reward::Model { gems: Some(25), ..reward(1) };
    let sv = Reward::new(&db);
    sv.disburse(1, 1, Some(&reward)).await.unwrap();

    let row = user_achievement::Entity::find_by_id((1, 1))
      .one(&db)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(row.state, AchievementState::Claimed);
    assert!(row.claimed_at.is_some());
    assert_eq!(fetch_user(&db, 1).await.gems, 25);

    // the second payout is rolled back with the refused claim
    assert!(matches!(
      sv.disburse(1, 1, Some(&reward)).await,
      Err(Error::NotClaimable(1))
    ));
    assert_eq!(fetch_user(&db, 1).await.gems, 25);
  }

  #[tokio::test]
  async fn test_disburse_without_reward() {
    let db = setup_test_db().await;
    user(&db, 1, 7).await;

    // no user_achievement row to claim
    assert!(matches!(
      Reward::new(&db).disburse(1, 3, None).await,
      Err(Error::NotClaimable(3))
    ));
    assert_eq!(fetch_user(&db, 1).await.gems, 7);
  }
}
