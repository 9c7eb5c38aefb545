//! Long-running services supervised by [`App`].

pub mod server;

use std::sync::Arc;

use tokio::{task::JoinHandle, time::sleep};

use crate::{prelude::*, state::AppState};

const RESTART_DELAY: Duration = Duration::from_secs(5);

#[async_trait::async_trait]
pub trait Plugin: Send + Sync {
  fn name(&self) -> &'static str {
    std::any::type_name::<Self>()
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct App {
  plugins: Vec<Arc<dyn Plugin>>,
}

impl App {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register<P: Plugin + 'static>(mut self, plugin: P) -> Self {
    self.plugins.push(Arc::new(plugin));
    self
  }

  /// Spawns a supervisor per plugin that restarts it after a crash.
  /// Aborting a returned handle stops its plugin for good.
  pub fn run(self, app: Arc<AppState>) -> Vec<JoinHandle<()>> {
    self
      .plugins
      .into_iter()
      .map(|plugin| tokio::spawn(supervise(plugin, app.clone())))
      .collect()
  }
}

async fn supervise(plugin: Arc<dyn Plugin>, app: Arc<AppState>) {
  let name = plugin.name();
  info!("Service `{name}` initialized");

  loop {
    let handle = tokio::spawn({
      let plugin = plugin.clone();
      let app = app.clone();
      async move { plugin.start(app).await }
    });

    match handle.await {
      Ok(Ok(())) => warn!("Service `{name}` stopped unexpectedly"),
      Ok(Err(err)) => error!("Service `{name}` crashed: {err:#}"),
      Err(err) if err.is_cancelled() => {
        info!("Service `{name}` shut down");
        break;
      }
      Err(_) => error!("Service `{name}` panicked"),
    }

    sleep(RESTART_DELAY).await;
    info!("Restarting service `{name}`...");
  }
}
