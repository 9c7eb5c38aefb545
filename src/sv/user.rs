use crate::{entity::user, prelude::*};

pub struct User<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> User<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn by_id(&self, id: i32) -> Result<Option<user::Model>> {
    Ok(user::Entity::find_by_id(id).one(self.db).await?)
  }

  pub async fn get(&self, id: i32) -> Result<user::Model> {
    self.by_id(id).await?.ok_or(Error::UserNotFound(id))
  }

  /// Records that the user added something to their wishlist for the
  /// first time. Achievements may depend on this flag.
  pub async fn flag_wishlist(&self, id: i32) -> Result<user::Model> {
    let user = self.get(id).await?;
    if user.added_wishlist {
      return Ok(user);
    }

    let user = user::ActiveModel { added_wishlist: Set(true), ..user.into() }
      .update(self.db)
      .await?;

    debug!("user {id} flagged first wishlist entry");
    Ok(user)
  }
}
