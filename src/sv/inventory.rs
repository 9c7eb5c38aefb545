//! Coupons owned by users

use sea_orm::{DbErr, sea_query::Expr};
use serde::Serialize;

use crate::{
  entity::{coupon, user_coupon},
  prelude::*,
};

#[derive(Debug, Serialize)]
pub struct OwnedCoupon {
  pub coupon: Option<coupon::Model>,
  pub quantity: i32,
}

pub struct Inventory<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Inventory<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn owned(&self, user_id: i32) -> Result<Vec<OwnedCoupon>> {
    let owned = user_coupon::Entity::find()
      .filter(user_coupon::Column::UserId.eq(user_id))
      .order_by_asc(user_coupon::Column::CouponId)
      .find_also_related(coupon::Entity)
      .all(self.db)
      .await?
      .into_iter()
      .map(|(held, coupon)| OwnedCoupon { coupon, quantity: held.quantity })
      .collect();
    Ok(owned)
  }

  pub async fn quantity(&self, user_id: i32, coupon_id: i32) -> Result<i32> {
    let held = user_coupon::Entity::find_by_id((user_id, coupon_id))
      .one(self.db)
      .await?;
    Ok(held.map_or(0, |held| held.quantity))
  }

  /// Adds one unit of a coupon, creating the inventory row on first grant.
  pub async fn grant<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    coupon_id: i32,
  ) -> Result<(), DbErr> {
    match user_coupon::Entity::find_by_id((user_id, coupon_id)).one(conn).await? {
      Some(held) => {
        let quantity = held.quantity + 1;
        user_coupon::ActiveModel { quantity: Set(quantity), ..held.into() }
          .update(conn)
          .await?;
      }
      None => {
        user_coupon::ActiveModel {
          user_id: Set(user_id),
          coupon_id: Set(coupon_id),
          quantity: Set(1),
        }
        .insert(conn)
        .await?;
      }
    }
    Ok(())
  }

  /// Takes one unit out of the inventory.
  pub async fn consume<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    coupon_id: i32,
  ) -> Result<()> {
    let res = user_coupon::Entity::update_many()
      .col_expr(
        user_coupon::Column::Quantity,
        Expr::col(user_coupon::Column::Quantity).sub(1),
      )
      .filter(user_coupon::Column::UserId.eq(user_id))
      .filter(user_coupon::Column::CouponId.eq(coupon_id))
      .filter(user_coupon::Column::Quantity.gt(0))
      .exec(conn)
      .await?;

    if res.rows_affected == 0 {
      return Err(Coupon::NotOwned(coupon_id).into());
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{entity::*, sv::testing::*};

  #[tokio::test]
  async fn test_grant_and_consume() {
    let db = setup_test_db().await;
    user(&db, 1, 0).await;
    coupon(&db, 5, Rarity::Rare, CouponType::Percentage, 10).await;

    Inventory::grant(&db, 1, 5).await.unwrap();
    Inventory::grant(&db, 1, 5).await.unwrap();

    let sv = Inventory::new(&db);
    assert_eq!(sv.quantity(1, 5).await.unwrap(), 2);

    Inventory::consume(&db, 1, 5).await.unwrap();
    Inventory::consume(&db, 1, 5).await.unwrap();
    assert!(matches!(
      Inventory::consume(&db, 1, 5).await,
      Err(Error::Coupon(Coupon::NotOwned(5)))
    ));

    let owned = sv.owned(1).await.unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].quantity, 0);
    assert_eq!(owned[0].coupon.as_ref().map(|c| c.id), Some(5));
  }

  #[tokio::test]
  async fn test_grant_unknown_coupon_fails() {
    let db = setup_test_db().await;
    user(&db, 1, 0).await;

    assert!(Inventory::grant(&db, 1, 404).await.is_err());
  }
}
