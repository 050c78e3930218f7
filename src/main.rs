mod engine;
mod entity;
mod error;
mod plugins;
mod prelude;
mod state;
mod sv;

use std::env;

use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{
  prelude::*,
  state::{AppState, Config},
};

#[tokio::main]
async fn main() {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "downline=debug,tower_http=debug,axum=trace,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_url = env::var("DATABASE_URL")
    .unwrap_or_else(|_| "sqlite:downline.db?mode=rwc".into());
  let config = Config::from_env();

  info!("Starting Downline Server v{}", env!("CARGO_PKG_VERSION"));
  info!(
    "exchange rate: {}, delete policy: {:?}",
    config.exchange_rate, config.delete_policy
  );

  let app = Arc::new(
    AppState::new(&db_url, config).await.expect("Failed to init app state"),
  );

  plugins::App::new()
    .register(plugins::cron::RankRefresh)
    .register(plugins::server::Plugin)
    .run(app)
    .await;
}
