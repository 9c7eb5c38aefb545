use serde::Serialize;

use crate::{
  entity::{order, order_item, product},
  prelude::*,
};

/// A purchased line together with the product it refers to.
#[derive(Debug, Serialize)]
pub struct OrderLine {
  pub quantity: i32,
  pub product: Option<product::Model>,
}

pub struct Order<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Order<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Orders of a user, newest first.
  pub async fn by_user(&self, user_id: i32) -> Result<Vec<order::Model>> {
    let orders = order::Entity::find()
      .filter(order::Column::UserId.eq(user_id))
      .order_by_desc(order::Column::OrderDate)
      .order_by_desc(order::Column::Id)
      .all(self.db)
      .await?;
    Ok(orders)
  }

  pub async fn lines(
    &self,
    user_id: i32,
    order_id: i32,
  ) -> Result<Vec<OrderLine>> {
    order::Entity::find_by_id(order_id)
      .filter(order::Column::UserId.eq(user_id))
      .one(self.db)
      .await?
      .ok_or(Error::OrderNotFound(order_id))?;

    let lines = order_item::Entity::find()
      .filter(order_item::Column::OrderId.eq(order_id))
      .order_by_asc(order_item::Column::ProductId)
      .find_also_related(product::Entity)
      .all(self.db)
      .await?
      .into_iter()
      .map(|(item, product)| OrderLine { quantity: item.quantity, product })
      .collect();

    Ok(lines)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::testing::*;

  async fn place(db: &DatabaseConnection, user_id: i32, days_ago: i64) -> i32 {
    let date = Utc::now().naive_utc() - chrono::Duration::days(days_ago);
    order::ActiveModel {
      id: NotSet,
      user_id: Set(user_id),
      order_date: Set(date),
      order_total: Set(10.0),
      status: Set("processing".into()),
    }
    .insert(db)
    .await
    .unwrap()
    .id
  }

  #[tokio::test]
  async fn test_orders_newest_first() {
    let db = setup_test_db().await;
    user(&db, 1, 0).await;
    let old = place(&db, 1, 3).await;
    let new = place(&db, 1, 0).await;

    let orders = Order::new(&db).by_user(1).await.unwrap();
    let ids: Vec<_> = orders.iter().map(|order| order.id).collect();
    assert_eq!(ids, [new, old]);
  }

  #[tokio::test]
  async fn test_lines_of_foreign_order_are_hidden() {
    let db = setup_test_db().await;
    user(&db, 1, 0).await;
    user(&db, 2, 0).await;
    product(&db, 7, 5.0, 10).await;
    let id = place(&db, 2, 0).await;
    order_item::ActiveModel {
      order_id: Set(id),
      product_id: Set(7),
      quantity: Set(2),
    }
    .insert(&db)
    .await
    .unwrap();

    let sv = Order::new(&db);
    assert!(matches!(sv.lines(1, id).await, Err(Error::OrderNotFound(_))));

    let lines = sv.lines(2, id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 2);
    assert_eq!(lines[0].product.as_ref().map(|p| p.id), Some(7));
  }
}
