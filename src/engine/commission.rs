//! Commission calculator: rank-capped walk over the downstream tree.

use super::roster::{Affiliate, Roster};
use crate::entity::Rank;

/// Nobody earns deeper than three levels, whatever their rank says.
pub const MAX_COMMISSION_DEPTH: u32 = 3;

/// Payout rates by relative level 1..=3, picked per subordinate by its
/// first-purchase flag.
const FIRST_PURCHASE_RATES: [f64; 3] = [0.25, 0.12, 0.05];
const SUBSEQUENT_PURCHASE_RATES: [f64; 3] = [0.02, 0.25, 0.05];

/// Total commission `affiliate` earns from its downstream organization,
/// converted through `exchange_rate`.
///
/// The level cap comes from the affiliate's *stored* rank; the caller is
/// responsible for refreshing it first. An unset rank earns nothing.
pub fn commission(
  roster: &Roster,
  affiliate: &Affiliate,
  exchange_rate: f64,
) -> f64 {
  let cap = affiliate.rank.as_ref().map(Rank::level_cap).unwrap_or(0);

  let mut total = 0.0;
  for child_id in roster.children_of(&affiliate.id) {
    walk(roster, child_id, 1, cap, &mut total);
  }
  total * exchange_rate
}

fn walk(roster: &Roster, id: &str, level: u32, cap: u32, total: &mut f64) {
  if level > cap || level > MAX_COMMISSION_DEPTH {
    return;
  }

  let Some(subordinate) = roster.get(id) else {
    return;
  };

  let rates = if subordinate.first_purchase_made {
    &FIRST_PURCHASE_RATES
  } else {
    &SUBSEQUENT_PURCHASE_RATES
  };
  *total += subordinate.score as f64 * rates[(level - 1) as usize];

  for child_id in roster.children_of(id) {
    walk(roster, child_id, level + 1, cap, total);
  }
}
