use std::env;

use crate::{prelude::*, sv};

/// What happens to an affiliate's direct subordinates when it is deleted.
///
/// With `Detach`, children keep their `parent_id` pointing at the
/// removed affiliate and become unreachable from the root until
/// re-attached.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeletePolicy {
  Detach,
  Cascade,
  Reparent,
  Refuse,
}

impl DeletePolicy {
  pub fn parse(raw: &str) -> Option<Self> {
    match raw.trim().to_ascii_lowercase().as_str() {
      "detach" => Some(Self::Detach),
      "cascade" => Some(Self::Cascade),
      "reparent" => Some(Self::Reparent),
      "refuse" => Some(Self::Refuse),
      _ => None,
    }
  }
}

#[derive(Clone, Debug)]
pub struct Config {
  /// Multiplier from the commission reference currency into R$.
  pub exchange_rate: f64,
  pub delete_policy: DeletePolicy,
  /// Interval of the persisted-rank refresh job; 0 disables it.
  pub rank_refresh_secs: u64,
}

impl Config {
  pub fn from_env() -> Self {
    let exchange_rate = env::var("EXCHANGE_RATE")
      .ok()
      .and_then(|raw| raw.parse().ok())
      .unwrap_or(4.00);

    let delete_policy = env::var("DELETE_POLICY")
      .map(|raw| {
        DeletePolicy::parse(&raw).expect("Invalid DELETE_POLICY value")
      })
      .unwrap_or(DeletePolicy::Detach);

    let rank_refresh_secs = env::var("RANK_REFRESH_SECS")
      .ok()
      .and_then(|raw| raw.parse().ok())
      .unwrap_or(300);

    Self { exchange_rate, delete_policy, rank_refresh_secs }
  }
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
}

impl AppState {
  pub async fn new(db_url: &str, config: Config) -> anyhow::Result<Self> {
    let db = Database::connect(db_url).await?;
    migration::Migrator::up(&db, None).await?;
    sv::Product::new(&db).seed().await?;

    Ok(Self { db, config })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_delete_policy() {
    assert_eq!(DeletePolicy::parse("detach"), Some(DeletePolicy::Detach));
    assert_eq!(DeletePolicy::parse(" Cascade "), Some(DeletePolicy::Cascade));
    assert_eq!(DeletePolicy::parse("reparent"), Some(DeletePolicy::Reparent));
    assert_eq!(DeletePolicy::parse("refuse"), Some(DeletePolicy::Refuse));
    assert_eq!(DeletePolicy::parse("drop"), None);
  }
}
