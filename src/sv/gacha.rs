//! Gacha draws paid in gems.
//!
//! A pull first rolls a rarity tier from [`RARITY_TABLE`], then picks a
//! coupon of that tier uniformly. All rolls are resolved before anything
//! is written, so a pull either settles completely or not at all.

use rand::{Rng, seq::SliceRandom};
use sea_orm::sea_query::Expr;
use serde::Serialize;

use crate::{
  entity::{Rarity, coupon, user},
  prelude::*,
  sv,
};

pub const PULL_COST: i64 = 50;
pub const PULL_XP: i64 = 100;
/// Blank prize, drawn like any other coupon but never credited.
pub const DUD_COUPON_ID: i32 = 1;

/// Rarity masses, checked in this order.
pub const RARITY_TABLE: [(Rarity, f64); 4] = [
  (Rarity::Common, 0.70),
  (Rarity::Rare, 0.20),
  (Rarity::SuperRare, 0.09),
  (Rarity::UltraRare, 0.01),
];

/// Maps `r` in `[0, 1)` to the first tier whose cumulative mass exceeds it.
pub fn roll_rarity(r: f64) -> Rarity {
  let mut acc = 0.0;
  for (rarity, mass) in RARITY_TABLE {
    acc += mass;
    if r < acc {
      return rarity;
    }
  }
  // the masses sum to slightly below 1.0 in floating point
  RARITY_TABLE[RARITY_TABLE.len() - 1].0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pull {
  Single,
  Ten,
}

impl Pull {
  pub fn rolls(self) -> usize {
    match self {
      Pull::Single => 1,
      Pull::Ten => 10,
    }
  }

  pub fn cost(self) -> i64 {
    PULL_COST * self.rolls() as i64
  }
}

impl TryFrom<u32> for Pull {
  type Error = Error;

  fn try_from(count: u32) -> Result<Self> {
    match count {
      1 => Ok(Pull::Single),
      10 => Ok(Pull::Ten),
      _ => Err(Error::InvalidRollCount(count)),
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Prize {
  Single(coupon::Model),
  Ten(Vec<coupon::Model>),
}

/// Coupon catalog grouped by rarity.
#[derive(Debug, Default)]
pub struct Pool {
  tiers: HashMap<Rarity, Vec<coupon::Model>>,
}

impl Pool {
  pub fn new(coupons: Vec<coupon::Model>) -> Self {
    let mut tiers: HashMap<Rarity, Vec<coupon::Model>> = HashMap::new();
    for coupon in coupons {
      tiers.entry(coupon.rarity).or_default().push(coupon);
    }
    Self { tiers }
  }

  pub fn resolve<R: Rng + ?Sized>(
    &self,
    rarity: Rarity,
    rng: &mut R,
  ) -> Result<&coupon::Model> {
    self
      .tiers
      .get(&rarity)
      .and_then(|tier| tier.choose(rng))
      .ok_or(Error::EmptyTier(rarity))
  }

  pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&coupon::Model> {
    self.resolve(roll_rarity(rng.gen_range(0.0..1.0)), rng)
  }

  pub fn missing_tiers(&self) -> Vec<Rarity> {
    RARITY_TABLE
      .iter()
      .map(|&(rarity, _)| rarity)
      .filter(|rarity| self.tiers.get(rarity).is_none_or(Vec::is_empty))
      .collect()
  }
}

pub struct Gacha<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Gacha<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn pool(&self) -> Result<Pool> {
    let coupons = coupon::Entity::find()
      .order_by_asc(coupon::Column::Id)
      .all(self.db)
      .await?;
    Ok(Pool::new(coupons))
  }

  pub async fn pull(&self, user_id: i32, pull: Pull) -> Result<Prize> {
    let user = sv::User::new(self.db).get(user_id).await?;
    let required = pull.cost();
    if user.gems < required {
      return Err(Error::InsufficientGems { required, balance: user.gems });
    }

    let pool = self.pool().await?;
    let won: Vec<coupon::Model> = {
      let mut rng = rand::thread_rng();
      (0..pull.rolls())
        .map(|_| pool.draw(&mut rng).cloned())
        .collect::<Result<_>>()?
    };

    let txn = self.db.begin().await?;
    Self::settle(&txn, &user, &won).await?;
    txn.commit().await?;

    info!(
      "user {user_id} pulled {} for {required} gems",
      won.iter().map(|c| c.id.to_string()).collect::<Vec<_>>().join(",")
    );

    Ok(match pull {
      Pull::Single => match won.into_iter().next() {
        Some(coupon) => Prize::Single(coupon),
        None => Prize::Ten(Vec::new()),
      },
      Pull::Ten => Prize::Ten(won),
    })
  }

  async fn settle<C: ConnectionTrait>(
    conn: &C,
    user: &user::Model,
    won: &[coupon::Model],
  ) -> Result<()> {
    for _ in won {
      let res = user::Entity::update_many()
        .col_expr(
          user::Column::Gems,
          Expr::col(user::Column::Gems).sub(PULL_COST),
        )
        .col_expr(user::Column::Xp, Expr::col(user::Column::Xp).add(PULL_XP))
        .col_expr(
          user::Column::PullsCount,
          Expr::col(user::Column::PullsCount).add(1),
        )
        .filter(user::Column::Id.eq(user.id))
        .filter(user::Column::Gems.gte(PULL_COST))
        .exec(conn)
        .await?;

      if res.rows_affected == 0 {
        return Err(Error::InsufficientGems {
          required: PULL_COST * won.len() as i64,
          balance: user.gems,
        });
      }
    }

    for coupon in won.iter().filter(|c| c.id != DUD_COUPON_ID) {
      sv::Inventory::grant(conn, user.id, coupon.id).await?;
    }

    Ok(())
  }
}
