//! The commission and qualification engine: pure, deterministic
//! functions of an immutable roster snapshot. Nothing in here touches
//! the database or mutates the roster.

pub mod commission;
pub mod rank;
pub mod roster;
pub mod volume;

pub use roster::{Affiliate, Roster};
use serde::Serialize;

/// One row of the commissions table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AffiliateReport {
  pub name: String,
  /// In R$, rounded to centavos.
  pub commission: f64,
  pub total_volume: i64,
  pub three_level_volume: i64,
  pub rank: String,
}

/// Builds the commissions table in roster order.
///
/// The rank column is classified fresh from the snapshot; the commission
/// column is capped by each affiliate's stored rank, so callers wanting
/// both in sync must persist refreshed ranks and reload first (which is
/// what `sv::Report` does).
pub fn reports(roster: &Roster, exchange_rate: f64) -> Vec<AffiliateReport> {
  roster
    .iter()
    .map(|affiliate| AffiliateReport {
      name: affiliate.name.clone(),
      commission: round_cents(commission::commission(
        roster,
        affiliate,
        exchange_rate,
      )),
      total_volume: volume::total_volume(roster, &affiliate.id),
      three_level_volume: volume::depth_limited_volume(
        roster,
        &affiliate.id,
        rank::RANK_VOLUME_DEPTH,
      ),
      rank: rank::classify(roster, affiliate).label().to_string(),
    })
    .collect()
}

fn round_cents(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}
