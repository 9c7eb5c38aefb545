//! Achievement progression.
//!
//! Per-user rows only move forward through
//! `locked -> available -> unlocked -> claimed`. Every transition is an
//! update guarded on the expected current state, so re-running the
//! reconciliation never moves a row backwards.

use sea_orm::{DbErr, sea_query::Expr};
use serde::Serialize;

use crate::{
  entity::{
    AchievementState, Condition, achievement, achievement_reward,
    user_achievement,
  },
  prelude::*,
  sv,
};

#[derive(Debug, Serialize)]
pub struct AchievementView {
  pub user_id: i32,
  pub achievement_id: i32,
  pub state: AchievementState,
  pub title: String,
  pub description: String,
  pub condition: Condition,
  pub progress: i64,
  pub reward_info: Option<String>,
  pub award_badge_id: Option<String>,
  pub claimed_at: Option<DateTime>,
}

impl AchievementView {
  fn new(
    row: user_achievement::Model,
    def: achievement::Model,
    reward: Option<&achievement_reward::Model>,
  ) -> Self {
    Self {
      user_id: row.user_id,
      achievement_id: row.achievement_id,
      state: row.state,
      title: def.title,
      description: def.description,
      condition: def.condition,
      progress: row.progress,
      reward_info: def.reward_info,
      award_badge_id: reward.and_then(|r| r.award_badge_id.clone()),
      claimed_at: row.claimed_at,
    }
  }
}

pub struct Achievement<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Achievement<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Brings stored progression in line with the user's current stats.
  pub async fn sync(&self, user_id: i32) -> Result<()> {
    let opened = self.refresh_availability(user_id).await?;
    let unlocked = self.evaluate_conditions(user_id).await?;
    if opened + unlocked > 0 {
      debug!("user {user_id}: {opened} achievements opened, {unlocked} unlocked");
    }
    Ok(())
  }

  /// Creates missing rows as locked and opens every locked achievement
  /// whose prerequisite has been claimed. Returns the number opened.
  pub async fn refresh_availability(&self, user_id: i32) -> Result<usize> {
    let definitions = achievement::Entity::find()
      .order_by_asc(achievement::Column::Id)
      .all(self.db)
      .await?;

    let mut states: HashMap<i32, AchievementState> =
      user_achievement::Entity::find()
        .filter(user_achievement::Column::UserId.eq(user_id))
        .all(self.db)
        .await?
        .into_iter()
        .map(|row| (row.achievement_id, row.state))
        .collect();

    for def in &definitions {
      if states.contains_key(&def.id) {
        continue;
      }

      user_achievement::ActiveModel {
        user_id: Set(user_id),
        achievement_id: Set(def.id),
        state: Set(AchievementState::Locked),
        progress: Set(0),
        claimed_at: Set(None),
      }
      .insert(self.db)
      .await?;
      states.insert(def.id, AchievementState::Locked);
    }

    let mut opened = 0;
    for def in &definitions {
      if states.get(&def.id) != Some(&AchievementState::Locked) {
        continue;
      }

      let ready = match def.required_id {
        None => true,
        Some(required) => {
          states.get(&required) == Some(&AchievementState::Claimed)
        }
      };

      if ready
        && Self::advance(
          self.db,
          user_id,
          def.id,
          AchievementState::Locked,
          AchievementState::Available,
        )
        .await?
      {
        states.insert(def.id, AchievementState::Available);
        opened += 1;
      }
    }

    Ok(opened)
  }

  /// Records progress on available achievements and unlocks those whose
  /// condition holds. Returns the number unlocked.
  pub async fn evaluate_conditions(&self, user_id: i32) -> Result<usize> {
    let user = sv::User::new(self.db).get(user_id).await?;

    let rows = user_achievement::Entity::find()
      .filter(user_achievement::Column::UserId.eq(user_id))
      .filter(user_achievement::Column::State.eq(AchievementState::Available))
      .find_also_related(achievement::Entity)
      .all(self.db)
      .await?;

    let mut unlocked = 0;
    for (row, def) in rows {
      let Some(def) = def else { continue };
      let (reading, met) = def.condition.evaluate(&user);

      user_achievement::Entity::update_many()
        .col_expr(
          user_achievement::Column::Progress,
          Expr::value(reading.progress()),
        )
        .filter(user_achievement::Column::UserId.eq(user_id))
        .filter(user_achievement::Column::AchievementId.eq(row.achievement_id))
        .filter(user_achievement::Column::State.eq(AchievementState::Available))
        .exec(self.db)
        .await?;

      if met
        && Self::advance(
          self.db,
          user_id,
          row.achievement_id,
          AchievementState::Available,
          AchievementState::Unlocked,
        )
        .await?
      {
        unlocked += 1;
      }
    }

    Ok(unlocked)
  }

  pub async fn list(
    &self,
    user_id: i32,
    state: AchievementState,
  ) -> Result<Vec<AchievementView>> {
    self.sync(user_id).await?;

    let rewards: HashMap<i32, achievement_reward::Model> =
      achievement_reward::Entity::find()
        .all(self.db)
        .await?
        .into_iter()
        .map(|reward| (reward.achievement_id, reward))
        .collect();

    let views = user_achievement::Entity::find()
      .filter(user_achievement::Column::UserId.eq(user_id))
      .filter(user_achievement::Column::State.eq(state))
      .order_by_asc(user_achievement::Column::AchievementId)
      .find_also_related(achievement::Entity)
      .all(self.db)
      .await?
      .into_iter()
      .filter_map(|(row, def)| {
        let reward = rewards.get(&row.achievement_id);
        def.map(|def| AchievementView::new(row, def, reward))
      })
      .collect();

    Ok(views)
  }

  /// Pays out an unlocked achievement and marks it claimed.
  ///
  /// The payout and the state change commit together, so a failed
  /// disbursement leaves the achievement claimable.
  pub async fn claim(
    &self,
    user_id: i32,
    achievement_id: i32,
  ) -> Result<Option<achievement_reward::Model>> {
    self.sync(user_id).await?;

    let state = self.state(user_id, achievement_id).await?;
    if state != Some(AchievementState::Unlocked) {
      return Err(Error::NotClaimable(achievement_id));
    }

    let reward = achievement_reward::Entity::find_by_id(achievement_id)
      .one(self.db)
      .await?;

    sv::Reward::new(self.db)
      .disburse(user_id, achievement_id, reward.as_ref())
      .await?;

    info!("user {user_id} claimed achievement {achievement_id}");

    // a fresh claim may satisfy another achievement's prerequisite
    self.refresh_availability(user_id).await?;

    Ok(reward)
  }

  async fn advance<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    achievement_id: i32,
    from: AchievementState,
    to: AchievementState,
  ) -> Result<bool, DbErr> {
    debug_assert!(from < to, "transitions only move forward");

    let res = user_achievement::Entity::update_many()
      .col_expr(user_achievement::Column::State, Expr::value(to))
      .filter(user_achievement::Column::UserId.eq(user_id))
      .filter(user_achievement::Column::AchievementId.eq(achievement_id))
      .filter(user_achievement::Column::State.eq(from))
      .exec(conn)
      .await?;

    Ok(res.rows_affected > 0)
  }

  /// Moves `unlocked` to `claimed`; false when the row was not unlocked.
  pub(crate) async fn mark_claimed<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    achievement_id: i32,
  ) -> Result<bool, DbErr> {
    let res = user_achievement::Entity::update_many()
      .col_expr(
        user_achievement::Column::State,
        Expr::value(AchievementState::Claimed),
      )
      .col_expr(
        user_achievement::Column::ClaimedAt,
        Expr::value(Utc::now().naive_utc()),
      )
      .filter(user_achievement::Column::UserId.eq(user_id))
      .filter(user_achievement::Column::AchievementId.eq(achievement_id))
      .filter(user_achievement::Column::State.eq(AchievementState::Unlocked))
      .exec(conn)
      .await?;

    Ok(res.rows_affected > 0)
  }

  async fn state(
    &self,
    user_id: i32,
    achievement_id: i32,
  ) -> Result<Option<AchievementState>> {
    let row = user_achievement::Entity::find_by_id((user_id, achievement_id))
      .one(self.db)
      .await?;
    Ok(row.map(|row| row.state))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    entity::*,
    sv::{Badge, Inventory, User, testing::*},
  };

  async fn states(
    db: &DatabaseConnection,
    ids: &[i32],
  ) -> Vec<AchievementState> {
    let sv = Achievement::new(db);
    let mut out = Vec::new();
    for &id in ids {
      out.push(sv.state(1, id).await.unwrap().unwrap());
    }
    out
  }

  #[tokio::test]
  async fn test_no_prerequisite_becomes_available() {
    let db = setup_test_db().await;
    user(&db, 1, 0).await;
    achievement(&db, 1, None, Attribute::PullsCount, Target::Threshold(5.0))
      .await;

    let sv = Achievement::new(&db);
    assert_eq!(sv.refresh_availability(1).await.unwrap(), 1);
    assert_eq!(states(&db, &[1]).await, [AchievementState::Available]);

    // idempotent
    assert_eq!(sv.refresh_availability(1).await.unwrap(), 0);
    assert_eq!(states(&db, &[1]).await, [AchievementState::Available]);
  }

  #[tokio::test]
  async fn test_prerequisite_gates_until_claimed() {
    let db = setup_test_db().await;
    user(&db, 1, 0).await;
    achievement(&db, 1, None, Attribute::AddedWishlist, Target::Flag(true))
      .await;
    achievement(&db, 2, Some(1), Attribute::Gems, Target::Threshold(0.0))
      .await;

    let sv = Achievement::new(&db);
    sv.sync(1).await.unwrap();
    assert_eq!(
      states(&db, &[1, 2]).await,
      [AchievementState::Available, AchievementState::Locked]
    );

    User::new(&db).flag_wishlist(1).await.unwrap();
    sv.sync(1).await.unwrap();
    assert_eq!(
      states(&db, &[1, 2]).await,
      [AchievementState::Unlocked, AchievementState::Locked]
    );

    sv.claim(1, 1).await.unwrap();
    assert_eq!(
      states(&db, &[1, 2]).await,
      [AchievementState::Claimed, AchievementState::Available]
    );

    // the dependent's condition (gems >= 0) is met on the next read
    let unlocked = sv.list(1, AchievementState::Unlocked).await.unwrap();
    assert_eq!(unlocked.len(), 1);
    assert_eq!(unlocked[0].achievement_id, 2);
  }

  #[tokio::test]
  async fn test_progress_tracks_stats_and_never_regresses() {
    let db = setup_test_db().await;
    user(&db, 1, 0).await;
    achievement(&db, 1, None, Attribute::Gems, Target::Threshold(100.0))
      .await;

    let sv = Achievement::new(&db);
    let available = sv.list(1, AchievementState::Available).await.unwrap();
    assert_eq!(available[0].progress, 0);

    let reward = achievement_reward::Model { gems: Some(60), ..reward(99) };
    sv::Reward::apply(&db, 1, &reward).await.unwrap();
    let available = sv.list(1, AchievementState::Available).await.unwrap();
    assert_eq!(available[0].progress, 60);

    sv::Reward::apply(&db, 1, &reward).await.unwrap();
    let unlocked = sv.list(1, AchievementState::Unlocked).await.unwrap();
    assert_eq!(unlocked[0].progress, 120);

    // dropping below the threshold keeps the achievement unlocked
    user::Entity::update_many()
      .col_expr(user::Column::Gems, Expr::value(0))
      .exec(&db)
      .await
      .unwrap();
    sv.sync(1).await.unwrap();
    assert_eq!(states(&db, &[1]).await, [AchievementState::Unlocked]);

    sv.claim(1, 1).await.unwrap();
    sv.sync(1).await.unwrap();
    assert_eq!(states(&db, &[1]).await, [AchievementState::Claimed]);
    assert!(matches!(sv.claim(1, 1).await, Err(Error::NotClaimable(1))));
  }

  #[tokio::test]
  async fn test_claim_not_unlocked_changes_nothing() {
    let db = setup_test_db().await;
    user(&db, 1, 10).await;
    achievement(&db, 1, None, Attribute::PullsCount, Target::Threshold(50.0))
      .await;
    store_reward(&db, achievement_reward::Model { gems: Some(500), ..reward(1) })
      .await;

    let sv = Achievement::new(&db);
    assert!(matches!(sv.claim(1, 1).await, Err(Error::NotClaimable(1))));
    assert!(matches!(sv.claim(1, 77).await, Err(Error::NotClaimable(77))));

    assert_eq!(fetch_user(&db, 1).await.gems, 10);
    assert_eq!(states(&db, &[1]).await, [AchievementState::Available]);
  }

  #[tokio::test]
  async fn test_claim_pays_reward() {
    let db = setup_test_db().await;
    user(&db, 1, 10).await;
    coupon(&db, 3, Rarity::Common, CouponType::Percentage, 5).await;
    badge(&db, "wishful").await;
    achievement(&db, 1, None, Attribute::AddedWishlist, Target::Flag(true))
      .await;
    store_reward(
      &db,
      achievement_reward::Model {
        xp: Some(30),
        gems: Some(20),
        coupon_id: Some(3),
        award_badge_id: Some("wishful".into()),
        ..reward(1)
      },
    )
    .await;

    User::new(&db).flag_wishlist(1).await.unwrap();

    let sv = Achievement::new(&db);
    let paid = sv.claim(1, 1).await.unwrap().unwrap();
    assert_eq!(paid.gems, Some(20));

    let after = fetch_user(&db, 1).await;
    assert_eq!((after.gems, after.xp), (30, 30));
    assert_eq!(Inventory::new(&db).quantity(1, 3).await.unwrap(), 1);
    assert_eq!(Badge::new(&db).unlocked(1).await.unwrap().len(), 1);

    let claimed = sv.list(1, AchievementState::Claimed).await.unwrap();
    assert_eq!(claimed.len(), 1);
    assert!(claimed[0].claimed_at.is_some());
    assert_eq!(claimed[0].award_badge_id.as_deref(), Some("wishful"));
  }

  #[tokio::test]
  async fn test_claim_without_reward_row() {
    let db = setup_test_db().await;
    user(&db, 1, 0).await;
    achievement(&db, 1, None, Attribute::Xp, Target::Threshold(0.0)).await;

    let sv = Achievement::new(&db);
    assert_eq!(sv.claim(1, 1).await.unwrap(), None);
    assert_eq!(states(&db, &[1]).await, [AchievementState::Claimed]);
  }

  #[tokio::test]
  async fn test_failed_disbursement_keeps_achievement_claimable() {
    let db = setup_test_db().await;
    user(&db, 1, 0).await;
    badge(&db, "spender").await;
    achievement(&db, 1, None, Attribute::Xp, Target::Threshold(0.0)).await;
    // a balance below zero violates the users check constraint
    store_reward(
      &db,
      achievement_reward::Model {
        gems: Some(-100),
        award_badge_id: Some("spender".into()),
        ..reward(1)
      },
    )
    .await;

    let sv = Achievement::new(&db);
    assert!(matches!(sv.claim(1, 1).await, Err(Error::Disbursement(_))));

    assert_eq!(states(&db, &[1]).await, [AchievementState::Unlocked]);
    assert_eq!(fetch_user(&db, 1).await.gems, 0);
    assert!(Badge::new(&db).unlocked(1).await.unwrap().is_empty());
  }
}
