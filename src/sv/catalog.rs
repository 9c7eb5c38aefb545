use crate::{
  entity::{category, product},
  prelude::*,
};

pub struct Catalog<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Catalog<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn categories(&self) -> Result<Vec<category::Model>> {
    let categories = category::Entity::find()
      .order_by_asc(category::Column::Name)
      .all(self.db)
      .await?;
    Ok(categories)
  }

  pub async fn products(
    &self,
    category_id: Option<&str>,
  ) -> Result<Vec<product::Model>> {
    let mut query = product::Entity::find().order_by_asc(product::Column::Id);

    if let Some(category_id) = category_id {
      query = query.filter(product::Column::CategoryId.eq(category_id));
    }

    Ok(query.all(self.db).await?)
  }

  pub async fn product(&self, id: i32) -> Result<product::Model> {
    product::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::ProductNotFound(id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::testing::*;

  #[tokio::test]
  async fn test_products_by_category() {
    let db = setup_test_db().await;
    product(&db, 1, 9.99, 3).await;
    let other = product(&db, 2, 19.99, 3).await;
    product::ActiveModel { category_id: Set("shoes".into()), ..other.into() }
      .update(&db)
      .await
      .unwrap();

    let sv = Catalog::new(&db);
    assert_eq!(sv.products(None).await.unwrap().len(), 2);

    let shoes = sv.products(Some("shoes")).await.unwrap();
    assert_eq!(shoes.len(), 1);
    assert_eq!(shoes[0].id, 2);

    assert!(matches!(sv.product(3).await, Err(Error::ProductNotFound(3))));
  }
}
