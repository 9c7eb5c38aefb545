//! Checkout: pricing, coupon redemption and order creation.

use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};

use crate::{
  entity::{
    CouponType, ProductStatus, UserLevel, coupon, order, order_item, product,
    user,
  },
  prelude::*,
  sv,
};

pub const CURRENCY: &str = "EUR";
/// Gems credited per whole currency unit spent.
pub const GEMS_PER_UNIT: i64 = 10;
/// A flat coupon may exceed the subtotal by at most this much.
pub const FLAT_COUPON_SLACK: f64 = 5.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
  pub product_id: i32,
  pub quantity: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReq {
  #[serde(default)]
  pub payment_method: String,
  pub items: Vec<LineItem>,
  pub coupon_id: Option<i32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quote {
  pub subtotal: f64,
  pub discount: f64,
  pub total: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
  pub order_id: String,
  pub subtotal: f64,
  pub discount: f64,
  pub total: f64,
  pub currency: &'static str,
  pub payment_method: String,
  /// Items as requested; the stored order holds the merged lines.
  pub items: Vec<LineItem>,
  pub coupon_id: Option<i32>,
}

pub fn round_cents(amount: f64) -> f64 {
  (amount * 100.0).round() / 100.0
}

pub fn gems_for(total: f64) -> i64 {
  GEMS_PER_UNIT * total.trunc() as i64
}

/// Prices a subtotal with an optional coupon and the user's tier.
///
/// The tier discount is taken from the original subtotal and stacks with
/// the coupon. The total never goes below zero.
pub fn quote(
  subtotal: f64,
  coupon: Option<&coupon::Model>,
  level: UserLevel,
) -> Result<Quote> {
  let mut discount = match coupon {
    None => 0.0,
    Some(coupon) => match coupon.kind {
      CouponType::Percentage => subtotal * f64::from(coupon.value) / 100.0,
      CouponType::Flat => {
        let value = f64::from(coupon.value);
        if subtotal < value - FLAT_COUPON_SLACK {
          return Err(Coupon::NotEligible(coupon.id).into());
        }
        value
      }
      CouponType::Dud => 0.0,
    },
  };
  discount += subtotal * level.discount_rate();

  Ok(Quote {
    subtotal: round_cents(subtotal),
    discount: round_cents(discount),
    total: round_cents((subtotal - discount).max(0.0)),
  })
}

/// Folds repeated products into one line, keeping first-seen order.
pub fn merge(items: &[LineItem]) -> Result<Vec<LineItem>> {
  if items.is_empty() {
    return Err(Error::Invalid("no items in checkout".into()));
  }

  let mut merged: Vec<LineItem> = Vec::with_capacity(items.len());
  for item in items {
    if item.quantity <= 0 {
      return Err(Error::Invalid(format!(
        "quantity of product {} must be positive",
        item.product_id
      )));
    }
    match merged.iter_mut().find(|line| line.product_id == item.product_id) {
      Some(line) => {
        line.quantity =
          line.quantity.checked_add(item.quantity).ok_or_else(|| {
            Error::Invalid(format!(
              "quantity of product {} is too large",
              item.product_id
            ))
          })?;
      }
      None => merged.push(item.clone()),
    }
  }
  Ok(merged)
}

// payment provider placeholder
fn approve_payment(method: &str, total: f64) -> bool {
  debug!("approving {total:.2} {CURRENCY} via `{method}`");
  true
}

pub struct Checkout<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Checkout<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn checkout(
    &self,
    user_id: i32,
    req: CheckoutReq,
  ) -> Result<OrderSummary> {
    let items = merge(&req.items)?;
    let user = sv::User::new(self.db).get(user_id).await?;

    let mut subtotal = 0.0;
    for item in &items {
      let product = product::Entity::find_by_id(item.product_id)
        .one(self.db)
        .await?
        .ok_or(Error::ProductNotFound(item.product_id))?;
      if item.quantity > product.stock {
        return Err(Error::InsufficientStock(item.product_id));
      }
      subtotal += product.price * f64::from(item.quantity);
    }

    let coupon = match req.coupon_id {
      Some(id) => Some(self.owned_coupon(user_id, id).await?),
      None => None,
    };
    let quote = quote(subtotal, coupon.as_ref(), user.level)?;

    if !approve_payment(&req.payment_method, quote.total) {
      return Err(Error::PaymentDeclined);
    }

    let txn = self.db.begin().await?;
    if let Some(coupon) = &coupon {
      sv::Inventory::consume(&txn, user_id, coupon.id).await?;
    }
    Self::credit(&txn, user_id, quote.total).await?;
    for item in &items {
      Self::take_stock(&txn, item).await?;
    }
    let order = Self::place(&txn, user_id, quote.total, &items).await?;
    txn.commit().await?;

    info!(
      "user {user_id} placed order {} over {:.2} {CURRENCY}",
      order.id, quote.total
    );

    Ok(OrderSummary {
      order_id: format!("ord_{}", order.id),
      subtotal: quote.subtotal,
      discount: quote.discount,
      total: quote.total,
      currency: CURRENCY,
      payment_method: req.payment_method,
      items: req.items,
      coupon_id: req.coupon_id,
    })
  }

  async fn owned_coupon(
    &self,
    user_id: i32,
    coupon_id: i32,
  ) -> Result<coupon::Model> {
    let held = sv::Inventory::new(self.db).quantity(user_id, coupon_id).await?;
    if held <= 0 {
      return Err(Coupon::NotOwned(coupon_id).into());
    }
    coupon::Entity::find_by_id(coupon_id)
      .one(self.db)
      .await?
      .ok_or(Error::Coupon(Coupon::NotOwned(coupon_id)))
  }

  async fn credit<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    total: f64,
  ) -> Result<()> {
    user::Entity::update_many()
      .col_expr(
        user::Column::Gems,
        Expr::col(user::Column::Gems).add(gems_for(total)),
      )
      .col_expr(
        user::Column::MoneySpent,
        Expr::col(user::Column::MoneySpent).add(total),
      )
      .filter(user::Column::Id.eq(user_id))
      .exec(conn)
      .await?;
    Ok(())
  }

  async fn take_stock<C: ConnectionTrait>(
    conn: &C,
    item: &LineItem,
  ) -> Result<()> {
    let res = product::Entity::update_many()
      .col_expr(
        product::Column::Stock,
        Expr::col(product::Column::Stock).sub(item.quantity),
      )
      .filter(product::Column::Id.eq(item.product_id))
      .filter(product::Column::Stock.gte(item.quantity))
      .exec(conn)
      .await?;
    if res.rows_affected == 0 {
      return Err(Error::InsufficientStock(item.product_id));
    }

    product::Entity::update_many()
      .col_expr(product::Column::Status, Expr::value(ProductStatus::SoldOut))
      .filter(product::Column::Id.eq(item.product_id))
      .filter(product::Column::Stock.lte(0))
      .exec(conn)
      .await?;
    Ok(())
  }

  async fn place<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    total: f64,
    items: &[LineItem],
  ) -> Result<order::Model> {
    let order = order::ActiveModel {
      id: NotSet,
      user_id: Set(user_id),
      order_date: Set(Utc::now().naive_utc()),
      order_total: Set(total),
      status: Set("processing".into()),
    }
    .insert(conn)
    .await?;

    order_item::Entity::insert_many(items.iter().map(|item| {
      order_item::ActiveModel {
        order_id: Set(order.id),
        product_id: Set(item.product_id),
        quantity: Set(item.quantity),
      }
    }))
    .exec_without_returning(conn)
    .await?;

    Ok(order)
  }
}
