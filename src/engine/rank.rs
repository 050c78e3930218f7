//! Qualification classifier: derives an affiliate's tier from its own
//! volume and the shape of its direct organization.

use super::{
  roster::{Affiliate, Roster},
  volume,
};
use crate::entity::Rank;

/// Minimum personal LP to qualify at all.
pub const QUALIFY_PERSONAL_LP: i64 = 50;
/// Minimum combined LP of direct subordinates to qualify at all.
pub const QUALIFY_DIRECT_LP: i64 = 50;
/// Direct subordinates needed to move past Associate.
pub const BUILDER_MIN_DIRECTS: usize = 3;
/// Three-level volume separating Builder from Elite Builder.
pub const ELITE_THREE_LEVEL_LP: i64 = 1000;
/// Depth of the volume window the classifier looks at.
pub const RANK_VOLUME_DEPTH: u32 = 3;

/// First match wins, top to bottom. Only these four tiers are ever
/// computed; the longer ladder shown in marketing material is display
/// progression, not qualification.
pub fn classify(roster: &Roster, affiliate: &Affiliate) -> Rank {
  let direct = roster.children_of(&affiliate.id);
  let direct_volume: i64 = direct
    .iter()
    .filter_map(|id| roster.get(id))
    .map(|child| child.score)
    .sum();

  if affiliate.score < QUALIFY_PERSONAL_LP || direct_volume < QUALIFY_DIRECT_LP
  {
    return Rank::NotQualified;
  }
  if direct.len() < BUILDER_MIN_DIRECTS {
    return Rank::Associate;
  }
  if volume::depth_limited_volume(roster, &affiliate.id, RANK_VOLUME_DEPTH)
    >= ELITE_THREE_LEVEL_LP
  {
    return Rank::EliteBuilder;
  }
  Rank::Builder
}

#[cfg(test)]
mod tests {
  use super::*;

  fn member(id: &str, parent: Option<&str>, score: i64) -> Affiliate {
    Affiliate {
      id: id.into(),
      name: id.to_uppercase(),
      score,
      parent_id: parent.map(Into::into),
      level: 0,
      first_purchase_made: false,
      rank: None,
    }
  }

  #[test]
  fn test_low_personal_score_is_not_qualified() {
    let roster =
      Roster::new(vec![member("0", None, 49), member("1", Some("0"), 200)]);
    let root = roster.get("0").unwrap();
    assert_eq!(classify(&roster, root), Rank::NotQualified);
  }

  #[test]
  fn test_low_direct_volume_is_not_qualified() {
    let roster =
      Roster::new(vec![member("0", None, 200), member("1", Some("0"), 49)]);
    let root = roster.get("0").unwrap();
    assert_eq!(classify(&roster, root), Rank::NotQualified);
  }

  #[test]
  fn test_childless_affiliate_is_not_qualified() {
    let roster = Roster::new(vec![member("0", None, 0)]);
    let root = roster.get("0").unwrap();
    assert_eq!(classify(&roster, root), Rank::NotQualified);
  }

  #[test]
  fn test_two_directs_is_associate() {
    // Exactly at both 50 LP thresholds, below three directs.
    let roster = Roster::new(vec![
      member("0", None, 50),
      member("1", Some("0"), 25),
      member("2", Some("0"), 25),
    ]);
    let root = roster.get("0").unwrap();
    assert_eq!(classify(&roster, root), Rank::Associate);
  }

  #[test]
  fn test_three_directs_below_elite_volume_is_builder() {
    // 60 + 3*60 + 3*10 = 270 LP over three levels, short of 1000.
    let mut affiliates = vec![member("0", None, 60)];
    for n in 1..=3 {
      affiliates.push(member(&n.to_string(), Some("0"), 60));
      affiliates.push(member(&(n + 3).to_string(), Some(&n.to_string()), 10));
    }
    let roster = Roster::new(affiliates);
    let root = roster.get("0").unwrap();
    assert_eq!(classify(&roster, root), Rank::Builder);
  }

  #[test]
  fn test_thousand_three_level_lp_is_elite_builder() {
    let roster = Roster::new(vec![
      member("0", None, 100),
      member("1", Some("0"), 300),
      member("2", Some("0"), 300),
      member("3", Some("0"), 300),
    ]);
    let root = roster.get("0").unwrap();
    assert_eq!(classify(&roster, root), Rank::EliteBuilder);
  }

  #[test]
  fn test_deep_volume_does_not_lift_elite_threshold() {
    // 940 LP inside the three-level window, the rest at depth 4.
    let roster = Roster::new(vec![
      member("0", None, 100),
      member("1", Some("0"), 280),
      member("2", Some("0"), 280),
      member("3", Some("0"), 280),
      member("4", Some("1"), 0),
      member("5", Some("4"), 0),
      member("6", Some("5"), 500),
    ]);
    let root = roster.get("0").unwrap();
    assert_eq!(classify(&roster, root), Rank::Builder);
  }

  #[test]
  fn test_classification_is_deterministic() {
    let roster = Roster::new(vec![
      member("0", None, 50),
      member("1", Some("0"), 25),
      member("2", Some("0"), 25),
    ]);
    let root = roster.get("0").unwrap();
    let first = classify(&roster, root);
    for _ in 0..10 {
      assert_eq!(classify(&roster, root), first);
    }
  }
}
