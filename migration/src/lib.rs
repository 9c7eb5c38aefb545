//! Database migrations using SeaORM

pub use sea_orm_migration::prelude::*;

mod m20260101_000001_create_users;
mod m20260101_000002_create_catalog;
mod m20260101_000003_create_orders;
mod m20260101_000004_create_coupons;
mod m20260101_000005_create_badges;
mod m20260101_000006_create_achievements;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260101_000001_create_users::Migration),
      Box::new(m20260101_000002_create_catalog::Migration),
      Box::new(m20260101_000003_create_orders::Migration),
      Box::new(m20260101_000004_create_coupons::Migration),
      Box::new(m20260101_000005_create_badges::Migration),
      Box::new(m20260101_000006_create_achievements::Migration),
    ]
  }
}

/// CHECK expression restricting a text column to a fixed set of values.
pub(crate) fn one_of<T: IntoIden + 'static>(
  col: T,
  values: &[&'static str],
) -> SimpleExpr {
  Expr::col(col).is_in(values.iter().copied())
}

pub(crate) const USER_LEVELS: &[&str] =
  &["guest", "standard", "silver", "gold", "platinum"];

pub(crate) const COUPON_RARITIES: &[&str] =
  &["common", "rare", "super_rare", "ultra_rare"];

#[cfg(test)]
mod tests {
  use sea_orm_migration::sea_orm::sea_query::SqliteQueryBuilder;

  use super::*;

  #[derive(DeriveIden)]
  enum Items {
    Table,
    Kind,
  }

  #[test]
  fn test_one_of_renders_check() {
    let sql = Table::create()
      .table(Items::Table)
      .col(
        ColumnDef::new(Items::Kind)
          .string()
          .not_null()
          .check(one_of(Items::Kind, &["a", "b"])),
      )
      .to_string(SqliteQueryBuilder);

    assert!(sql.contains("CHECK"), "{sql}");
    assert!(sql.contains("IN ('a', 'b')"), "{sql}");
  }
}
