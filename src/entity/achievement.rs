//! Achievement definitions and their unlock conditions

// `FromJsonQueryResult` expands to `serde_json::` paths
#[allow(unused_imports)]
use json as serde_json;
use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

use super::user;

/// User attributes an achievement condition may refer to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
  Gems,
  Xp,
  PullsCount,
  MoneySpent,
  AddedWishlist,
}

/// Current value of a user attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reading {
  Flag(bool),
  Number(f64),
}

impl Attribute {
  pub fn read(self, user: &user::Model) -> Reading {
    match self {
      Self::Gems => Reading::Number(user.gems as f64),
      Self::Xp => Reading::Number(user.xp as f64),
      Self::PullsCount => Reading::Number(user.pulls_count as f64),
      Self::MoneySpent => Reading::Number(user.money_spent),
      Self::AddedWishlist => Reading::Flag(user.added_wishlist),
    }
  }
}

impl Reading {
  fn as_number(self) -> f64 {
    match self {
      Self::Flag(flag) => f64::from(u8::from(flag)),
      Self::Number(n) => n,
    }
  }

  /// Progress is stored as a non-negative integer; flags become 0/1.
  pub fn progress(self) -> i64 {
    self.as_number().max(0.0).floor() as i64
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
  Flag(bool),
  Threshold(f64),
}

#[derive(
  Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct Condition {
  pub col: Attribute,
  pub value: Target,
}

impl Condition {
  /// Flags must match exactly, thresholds are met from below.
  pub fn is_met(&self, reading: Reading) -> bool {
    match (self.value, reading) {
      (Target::Flag(want), Reading::Flag(got)) => want == got,
      (Target::Flag(_), Reading::Number(_)) => false,
      (Target::Threshold(min), reading) => reading.as_number() >= min,
    }
  }

  pub fn evaluate(&self, user: &user::Model) -> (Reading, bool) {
    let reading = self.col.read(user);
    (reading, self.is_met(reading))
  }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "achievements")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub title: String,
  pub description: String,
  pub reward_info: Option<String>,
  /// Achievement that must be claimed before this one becomes available
  pub required_id: Option<i32>,
  #[sea_orm(column_type = "Json")]
  pub condition: Condition,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "Entity",
    from = "Column::RequiredId",
    to = "Column::Id",
    on_delete = "SetNull"
  )]
  Required,
  #[sea_orm(has_one = "super::achievement_reward::Entity")]
  Reward,
  #[sea_orm(has_many = "super::user_achievement::Entity")]
  Progress,
}

impl Related<super::achievement_reward::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Reward.def()
  }
}

impl Related<super::user_achievement::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Progress.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
  use super::*;

  fn user() -> user::Model {
    user::Model {
      id: 1,
      username: "Bob".into(),
      avatar_url: None,
      level: user::UserLevel::Standard,
      gems: 120,
      xp: 0,
      pulls_count: 3,
      money_spent: 49.99,
      added_wishlist: false,
    }
  }

  #[test]
  fn test_condition_parses_from_seed_json() {
    let flag: Condition =
      json::from_str(r#"{"col":"added_wishlist","value":true}"#).unwrap();
    assert_eq!(flag.value, Target::Flag(true));

    let threshold: Condition =
      json::from_str(r#"{"col":"pulls_count","value":10}"#).unwrap();
    assert_eq!(threshold.col, Attribute::PullsCount);
    assert_eq!(threshold.value, Target::Threshold(10.0));

    assert!(json::from_str::<Condition>(r#"{"col":"password","value":1}"#)
      .is_err());
  }

  #[test]
  fn test_threshold_conditions() {
    let mut user = user();
    let cond =
      Condition { col: Attribute::PullsCount, value: Target::Threshold(3.0) };
    assert_eq!(cond.evaluate(&user), (Reading::Number(3.0), true));

    user.pulls_count = 2;
    assert!(!cond.evaluate(&user).1);

    let spent =
      Condition { col: Attribute::MoneySpent, value: Target::Threshold(50.0) };
    let (reading, met) = spent.evaluate(&user);
    assert!(!met);
    assert_eq!(reading.progress(), 49);
  }

  #[test]
  fn test_flag_conditions() {
    let mut user = user();
    let cond =
      Condition { col: Attribute::AddedWishlist, value: Target::Flag(true) };

    let (reading, met) = cond.evaluate(&user);
    assert!(!met);
    assert_eq!(reading.progress(), 0);

    user.added_wishlist = true;
    let (reading, met) = cond.evaluate(&user);
    assert!(met);
    assert_eq!(reading.progress(), 1);

    let numeric =
      Condition { col: Attribute::Gems, value: Target::Flag(true) };
    assert!(!numeric.evaluate(&user).1);
  }
}
