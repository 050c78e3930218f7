use std::sync::Arc;

use async_trait::async_trait;

use crate::{plugins::Plugin, prelude::*, state::AppState, sv};

/// Keeps the persisted ranks warm. Commissions refresh ranks on their
/// own; this job keeps the stored column from drifting in between, so
/// roster reads show current tiers too.
pub struct RankRefresh;

#[async_trait]
impl Plugin for RankRefresh {
  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let interval_secs = app.config.rank_refresh_secs;
    if interval_secs == 0 {
      info!("rank refresh disabled via config (0 secs)");
      return Ok(());
    }

    info!("rank refresh started (interval: {}s)", interval_secs);

    tokio::spawn(async move {
      let mut interval =
        tokio::time::interval(Duration::from_secs(interval_secs));

      // skip the tick at startup
      interval.tick().await;

      loop {
        interval.tick().await;

        match sv::Report::new(&app.db).refresh_ranks().await {
          Ok(0) => {}
          Ok(updated) => info!("refreshed {updated} affiliate ranks"),
          Err(err) => error!("rank refresh failed: {err}"),
        }
      }
    });

    Ok(())
  }
}
