use std::collections::HashMap;

use crate::entity::{Rank, affiliate};

/// One affiliate as the engine sees it. A plain value detached from the
/// database row it was loaded from.
#[derive(Clone, Debug, PartialEq)]
pub struct Affiliate {
  pub id: String,
  pub name: String,
  pub score: i64,
  /// `None` marks the root.
  pub parent_id: Option<String>,
  pub level: i32,
  pub first_purchase_made: bool,
  /// Stored tier as of the last refresh; `None` means never classified.
  pub rank: Option<Rank>,
}

impl From<affiliate::Model> for Affiliate {
  fn from(model: affiliate::Model) -> Self {
    Self {
      id: model.id,
      name: model.name,
      score: model.score,
      parent_id: model.parent_id,
      level: model.level,
      first_purchase_made: model.first_purchase_made,
      rank: model.rank,
    }
  }
}

/// Immutable roster snapshot. Built once per engine invocation; the
/// id -> direct-children index avoids scanning the whole roster on every
/// child lookup.
pub struct Roster {
  affiliates: Vec<Affiliate>,
  by_id: HashMap<String, usize>,
  children: HashMap<String, Vec<String>>,
}

impl Roster {
  pub fn new(affiliates: Vec<Affiliate>) -> Self {
    let mut by_id = HashMap::with_capacity(affiliates.len());
    let mut children: HashMap<String, Vec<String>> = HashMap::new();

    for (pos, affiliate) in affiliates.iter().enumerate() {
      by_id.insert(affiliate.id.clone(), pos);
      if let Some(parent_id) = &affiliate.parent_id {
        children
          .entry(parent_id.clone())
          .or_default()
          .push(affiliate.id.clone());
      }
    }

    Self { affiliates, by_id, children }
  }

  pub fn get(&self, id: &str) -> Option<&Affiliate> {
    self.by_id.get(id).map(|&pos| &self.affiliates[pos])
  }

  /// Direct subordinates in roster order; empty for unknown ids.
  pub fn children_of(&self, id: &str) -> &[String] {
    self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn iter(&self) -> impl Iterator<Item = &Affiliate> {
    self.affiliates.iter()
  }

  #[allow(dead_code)]
  pub fn root(&self) -> Option<&Affiliate> {
    self.affiliates.iter().find(|a| a.parent_id.is_none())
  }

  /// Every non-null `parent_id` resolves to an existing affiliate.
  /// Callers are expected to check this before trusting tree-dependent
  /// output; the engine itself never rejects a roster.
  pub fn is_valid_hierarchy(&self) -> bool {
    self.affiliates.iter().all(|a| match &a.parent_id {
      Some(parent_id) => self.by_id.contains_key(parent_id),
      None => true,
    })
  }
}
