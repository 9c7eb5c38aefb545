use std::{env, path::PathBuf, str::FromStr};

use migration::{Migrator, MigratorTrait};

use crate::{prelude::*, sv};

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub port: u16,
  pub seed_dir: PathBuf,
  /// Identity every request acts as until real auth exists
  pub user_id: i32,
  pub starting_gems: i64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: String::from("sqlite:storefront.db?mode=rwc"),
      port: 3000,
      seed_dir: PathBuf::from("./seed"),
      user_id: 1,
      starting_gems: 1000,
    }
  }
}

fn var<T>(key: &str, default: T) -> anyhow::Result<T>
where
  T: FromStr,
  T::Err: std::error::Error + Send + Sync + 'static,
{
  match env::var(key) {
    Ok(raw) => raw.trim().parse().with_context(|| format!("Invalid {key}")),
    Err(_) => Ok(default),
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let default = Self::default();
    Ok(Self {
      database_url: var("DATABASE_URL", default.database_url)?,
      port: var("PORT", default.port)?,
      seed_dir: var("SEED_DIR", default.seed_dir)?,
      user_id: var("USER_ID", default.user_id)?,
      starting_gems: var("STARTING_GEMS", default.starting_gems)?,
    })
  }
}

pub struct Services<'a> {
  pub user: sv::User<'a>,
  pub catalog: sv::Catalog<'a>,
  pub order: sv::Order<'a>,
  pub inventory: sv::Inventory<'a>,
  pub badge: sv::Badge<'a>,
  pub achievement: sv::Achievement<'a>,
  pub gacha: sv::Gacha<'a>,
  pub checkout: sv::Checkout<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
      .await
      .context("Failed to connect to database")?;

    Self::with_db(db, config).await
  }

  pub async fn with_db(
    db: DatabaseConnection,
    config: Config,
  ) -> anyhow::Result<Self> {
    info!("Running migrations...");
    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    let seed = sv::Seed::new(&db);
    seed
      .load_dir(&config.seed_dir)
      .await
      .with_context(|| format!("Failed to seed from {:?}", config.seed_dir))?;
    seed.default_user(config.user_id, config.starting_gems).await?;

    Ok(Self { db, config })
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      user: sv::User::new(&self.db),
      catalog: sv::Catalog::new(&self.db),
      order: sv::Order::new(&self.db),
      inventory: sv::Inventory::new(&self.db),
      badge: sv::Badge::new(&self.db),
      achievement: sv::Achievement::new(&self.db),
      gacha: sv::Gacha::new(&self.db),
      checkout: sv::Checkout::new(&self.db),
    }
  }
}
