//! Catalog seeding from JSON files.
//!
//! Every file holds an array of rows in the table's own shape. Rows whose
//! primary key already exists are left untouched, so seeding is safe to
//! repeat on every start.

use std::{collections::HashSet, io::ErrorKind, path::Path};

use sea_orm::{
  IntoActiveModel, Iterable, PrimaryKeyToColumn, sea_query::OnConflict,
};
use serde::de::DeserializeOwned;
use tokio::fs;

use crate::{
  entity::{
    UserLevel, achievement, achievement_reward, badge, category, coupon,
    product, user,
  },
  prelude::*,
  sv,
};

pub const DEFAULT_USERNAME: &str = "Bob";
pub const DEFAULT_AVATAR: &str = "/user_avatar.png";

pub struct Seed<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Seed<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn load_dir(&self, dir: &Path) -> Result<()> {
    let categories = read::<category::Model>(dir, "categories.json").await?;
    let products = read::<product::Model>(dir, "products.json").await?;
    let coupons = read::<coupon::Model>(dir, "coupons.json").await?;
    let badges = read::<badge::Model>(dir, "badges.json").await?;
    let achievements =
      read::<achievement::Model>(dir, "achievements.json").await?;
    let rewards =
      read::<achievement_reward::Model>(dir, "achievement_rewards.json")
        .await?;

    let mut graph: Vec<(i32, Option<i32>)> = achievement::Entity::find()
      .all(self.db)
      .await?
      .into_iter()
      .map(|def| (def.id, def.required_id))
      .collect();
    // stored rows win over the file, as the inserts skip them
    let stored: HashSet<i32> = graph.iter().map(|&(id, _)| id).collect();
    graph.extend(
      achievements
        .iter()
        .filter(|def| !stored.contains(&def.id))
        .map(|def| (def.id, def.required_id)),
    );
    check_prerequisites(&graph)?;

    let txn = self.db.begin().await?;
    let inserted = [
      insert_missing::<category::Entity, _>(&txn, categories).await?,
      insert_missing::<coupon::Entity, _>(&txn, coupons).await?,
      insert_missing::<badge::Entity, _>(&txn, badges).await?,
      insert_missing::<product::Entity, _>(&txn, products).await?,
      insert_missing::<achievement::Entity, _>(&txn, achievements).await?,
      insert_missing::<achievement_reward::Entity, _>(&txn, rewards).await?,
    ];
    txn.commit().await?;

    info!(
      "Seeded {} categories, {} coupons, {} badges, {} products, \
       {} achievements, {} rewards",
      inserted[0], inserted[1], inserted[2], inserted[3], inserted[4],
      inserted[5]
    );

    for rarity in sv::Gacha::new(self.db).pool().await?.missing_tiers() {
      warn!("No coupons of rarity {rarity:?}, pulls landing there will fail");
    }

    Ok(())
  }

  /// Creates the configured user unless it already exists.
  pub async fn default_user(&self, id: i32, gems: i64) -> Result<()> {
    if sv::User::new(self.db).by_id(id).await?.is_some() {
      return Ok(());
    }

    user::ActiveModel {
      id: Set(id),
      username: Set(DEFAULT_USERNAME.into()),
      avatar_url: Set(Some(DEFAULT_AVATAR.into())),
      level: Set(UserLevel::default()),
      gems: Set(gems),
      xp: Set(0),
      pulls_count: Set(0),
      money_spent: Set(0.0),
      added_wishlist: Set(false),
    }
    .insert(self.db)
    .await?;

    info!("Created default user {id} with {gems} gems");
    Ok(())
  }
}

async fn read<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Vec<T>> {
  let path = dir.join(name);
  let raw = match fs::read_to_string(&path).await {
    Ok(raw) => raw,
    Err(err) if err.kind() == ErrorKind::NotFound => {
      warn!("Seed file {} not found, skipping", path.display());
      return Ok(Vec::new());
    }
    Err(err) => return Err(err.into()),
  };

  json::from_str(&raw)
    .map_err(|err| Error::Seed(format!("{}: {err}", path.display())))
}

async fn insert_missing<E, C>(conn: &C, models: Vec<E::Model>) -> Result<u64>
where
  E: EntityTrait,
  E::Model: IntoActiveModel<E::ActiveModel>,
  C: ConnectionTrait,
{
  if models.is_empty() {
    return Ok(0);
  }

  let keys = E::PrimaryKey::iter().map(|key| key.into_column());
  let models = models.into_iter().map(|model| model.into_active_model());
  let inserted = E::insert_many(models)
    .on_conflict(OnConflict::columns(keys).do_nothing().to_owned())
    .exec_without_returning(conn)
    .await?;

  Ok(inserted)
}

/// Rejects prerequisite chains that point at unknown achievements or loop
/// back on themselves.
pub fn check_prerequisites(graph: &[(i32, Option<i32>)]) -> Result<()> {
  let required: HashMap<i32, Option<i32>> = graph.iter().copied().collect();

  for &(start, _) in graph {
    let mut current = start;
    let mut steps = 0;
    while let Some(Some(next)) = required.get(&current) {
      if !required.contains_key(next) {
        return Err(Error::Seed(format!(
          "achievement {current} requires unknown achievement {next}"
        )));
      }
      steps += 1;
      if *next == start || steps > required.len() {
        return Err(Error::Seed(format!(
          "achievement {start} is part of a prerequisite cycle"
        )));
      }
      current = *next;
    }
  }
  Ok(())
}
