use sea_orm::{DatabaseTransaction, sea_query::Expr};
use serde::Deserialize;

use crate::{
  engine,
  entity::{affiliate, free_id},
  prelude::*,
  state::DeletePolicy,
};

/// Roster mutations and snapshot loading. The engine never sees the
/// database; this service turns rows into `engine::Roster` values.
pub struct Roster<'a> {
  db: &'a DatabaseConnection,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EditAffiliate {
  pub name: Option<String>,
  pub score: Option<i64>,
  pub first_purchase_made: Option<bool>,
}

impl<'a> Roster<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// All affiliates in insertion order.
  pub async fn all(&self) -> Result<Vec<affiliate::Model>> {
    let affiliates = affiliate::Entity::find()
      .order_by_asc(affiliate::Column::Seq)
      .all(self.db)
      .await?;
    Ok(affiliates)
  }

  #[allow(dead_code)]
  pub async fn by_id(&self, id: &str) -> Result<Option<affiliate::Model>> {
    let affiliate = affiliate::Entity::find_by_id(id).one(self.db).await?;
    Ok(affiliate)
  }

  /// Reads the roster into an immutable engine snapshot.
  pub async fn load(&self) -> Result<engine::Roster> {
    let models = self.all().await?;
    Ok(engine::Roster::new(models.into_iter().map(Into::into).collect()))
  }

  /// Creates the single root affiliate. There can be only one.
  pub async fn create_root(&self, name: &str) -> Result<affiliate::Model> {
    let name = normalize_name(name)?;
    let txn = self.db.begin().await?;

    let root = affiliate::Entity::find()
      .filter(affiliate::Column::ParentId.is_null())
      .one(&txn)
      .await?;
    if root.is_some() {
      return Err(Error::RootAlreadyExists);
    }
    Self::ensure_name_free(&txn, &name, None).await?;

    let model = Self::insert(&txn, name, None, 0).await?;
    txn.commit().await?;
    Ok(model)
  }

  /// Attaches a new direct subordinate below `parent_id`, one level
  /// deeper than its parent.
  pub async fn add_subordinate(
    &self,
    parent_id: &str,
    name: &str,
  ) -> Result<affiliate::Model> {
    let name = normalize_name(name)?;
    let txn = self.db.begin().await?;

    let parent = affiliate::Entity::find_by_id(parent_id)
      .one(&txn)
      .await?
      .ok_or(Error::AffiliateNotFound)?;
    Self::ensure_name_free(&txn, &name, None).await?;

    let model =
      Self::insert(&txn, name, Some(parent.id), parent.level + 1).await?;
    txn.commit().await?;
    Ok(model)
  }

  /// Edits name, score and the first-purchase flag. `parent_id` and
  /// `level` are fixed at creation time and never change here.
  pub async fn edit(
    &self,
    id: &str,
    changes: EditAffiliate,
  ) -> Result<affiliate::Model> {
    let txn = self.db.begin().await?;

    let target = affiliate::Entity::find_by_id(id)
      .one(&txn)
      .await?
      .ok_or(Error::AffiliateNotFound)?;

    if changes.name.is_none()
      && changes.score.is_none()
      && changes.first_purchase_made.is_none()
    {
      return Ok(target);
    }

    let mut active: affiliate::ActiveModel = target.clone().into();

    if let Some(name) = changes.name {
      let name = normalize_name(&name)?;
      if name != target.name {
        Self::ensure_name_free(&txn, &name, Some(id)).await?;
      }
      active.name = Set(name);
    }
    if let Some(score) = changes.score {
      if score < 0 {
        return Err(Error::InvalidArgs("score must be non-negative".into()));
      }
      active.score = Set(score);
    }
    if let Some(flag) = changes.first_purchase_made {
      active.first_purchase_made = Set(flag);
    }

    let model = active.update(&txn).await?;
    txn.commit().await?;
    Ok(model)
  }

  /// Removes an affiliate; what happens to its subordinates is the
  /// configured policy's call. Freed numeric ids go back to the reuse
  /// queue either way.
  pub async fn delete(&self, id: &str, policy: DeletePolicy) -> Result<()> {
    let txn = self.db.begin().await?;

    let target = affiliate::Entity::find_by_id(id)
      .one(&txn)
      .await?
      .ok_or(Error::AffiliateNotFound)?;

    let children = affiliate::Entity::find()
      .filter(affiliate::Column::ParentId.eq(id))
      .all(&txn)
      .await?;

    match policy {
      DeletePolicy::Refuse if !children.is_empty() => {
        return Err(Error::HasSubordinates);
      }
      DeletePolicy::Cascade => {
        let doomed = Self::collect_subtree(&txn, &target).await?;
        for member in &doomed {
          affiliate::Entity::delete_by_id(member.id.as_str())
            .exec(&txn)
            .await?;
          Self::push_free_id(&txn, &member.id).await?;
        }
        txn.commit().await?;
        return Ok(());
      }
      DeletePolicy::Reparent => {
        for child in children {
          // The child moves up to the deleted node's slot; deeper
          // descendants keep their creation-time levels.
          affiliate::ActiveModel {
            parent_id: Set(target.parent_id.clone()),
            level: Set(target.level),
            ..child.into()
          }
          .update(&txn)
          .await?;
        }
      }
      // Detach leaves children pointing at the removed id; hierarchy
      // validation will flag the roster until they are re-attached.
      DeletePolicy::Detach | DeletePolicy::Refuse => {}
    }

    affiliate::Entity::delete_by_id(target.id.as_str()).exec(&txn).await?;
    Self::push_free_id(&txn, &target.id).await?;
    txn.commit().await?;
    Ok(())
  }

  async fn collect_subtree(
    txn: &DatabaseTransaction,
    target: &affiliate::Model,
  ) -> Result<Vec<affiliate::Model>> {
    let mut doomed = vec![target.clone()];
    let mut visited = HashSet::from([target.id.clone()]);
    let mut queue = vec![target.id.clone()];

    while let Some(id) = queue.pop() {
      let children = affiliate::Entity::find()
        .filter(affiliate::Column::ParentId.eq(id.as_str()))
        .all(txn)
        .await?;
      for child in children {
        if visited.insert(child.id.clone()) {
          queue.push(child.id.clone());
          doomed.push(child);
        }
      }
    }

    Ok(doomed)
  }

  async fn insert(
    txn: &DatabaseTransaction,
    name: String,
    parent_id: Option<String>,
    level: i32,
  ) -> Result<affiliate::Model> {
    let id = Self::next_id(txn).await?;
    let seq = Self::next_seq(txn).await?;
    let now = Utc::now().naive_utc();

    let model = affiliate::ActiveModel {
      id: Set(id),
      name: Set(name),
      score: Set(0),
      parent_id: Set(parent_id),
      level: Set(level),
      first_purchase_made: Set(false),
      rank: Set(None),
      seq: Set(seq),
      created_at: Set(now),
    }
    .insert(txn)
    .await?;

    Ok(model)
  }

  /// Oldest freed id first, otherwise one past the highest ever used.
  async fn next_id(txn: &DatabaseTransaction) -> Result<String> {
    if let Some(free) = free_id::Entity::find()
      .order_by_asc(free_id::Column::Seq)
      .one(txn)
      .await?
    {
      free_id::Entity::delete_by_id(free.seq).exec(txn).await?;
      return Ok(free.value.to_string());
    }

    let ids: Vec<String> = affiliate::Entity::find()
      .select_only()
      .column(affiliate::Column::Id)
      .into_tuple()
      .all(txn)
      .await?;

    let next = ids
      .iter()
      .filter_map(|id| id.parse::<i64>().ok())
      .max()
      .map(|max| max + 1)
      .unwrap_or(0);
    Ok(next.to_string())
  }

  async fn next_seq(txn: &DatabaseTransaction) -> Result<i64> {
    let max: Option<Option<i64>> = affiliate::Entity::find()
      .select_only()
      .column_as(Expr::col(affiliate::Column::Seq).max(), "seq")
      .into_tuple()
      .one(txn)
      .await?;

    Ok(max.flatten().map(|seq| seq + 1).unwrap_or(0))
  }

  async fn push_free_id(txn: &DatabaseTransaction, id: &str) -> Result<()> {
    // ids are decimal strings by construction
    if let Ok(value) = id.parse::<i64>() {
      free_id::ActiveModel { seq: NotSet, value: Set(value) }
        .insert(txn)
        .await?;
    }
    Ok(())
  }

  async fn ensure_name_free(
    txn: &DatabaseTransaction,
    name: &str,
    exclude: Option<&str>,
  ) -> Result<()> {
    let existing = affiliate::Entity::find()
      .filter(affiliate::Column::Name.eq(name))
      .one(txn)
      .await?;

    if let Some(existing) = existing
      && exclude != Some(existing.id.as_str())
    {
      return Err(Error::NameTaken);
    }
    Ok(())
  }
}

fn normalize_name(raw: &str) -> Result<String> {
  let name = raw.trim();
  if name.is_empty() {
    return Err(Error::InvalidArgs("name must not be empty".into()));
  }
  Ok(name.to_uppercase())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::test_utils::test_db;

  #[tokio::test]
  async fn test_create_root() {
    let db = test_db::setup().await;
    let sv = Roster::new(&db);

    let root = sv.create_root("  ana lúcia ").await.unwrap();
    assert_eq!(root.id, "0");
    assert_eq!(root.name, "ANA LÚCIA");
    assert_eq!(root.score, 0);
    assert_eq!(root.level, 0);
    assert_eq!(root.parent_id, None);
    assert!(!root.first_purchase_made);
    assert_eq!(root.rank, None);
  }

  #[tokio::test]
  async fn test_single_root_enforced() {
    let db = test_db::setup().await;
    let sv = Roster::new(&db);

    sv.create_root("ana").await.unwrap();
    assert!(matches!(
      sv.create_root("bia").await,
      Err(Error::RootAlreadyExists)
    ));
  }

  #[tokio::test]
  async fn test_duplicate_names_rejected() {
    let db = test_db::setup().await;
    let sv = Roster::new(&db);

    sv.create_root("ana").await.unwrap();
    assert!(matches!(
      sv.add_subordinate("0", "Ana").await,
      Err(Error::NameTaken)
    ));
    assert!(matches!(
      sv.add_subordinate("0", "  ").await,
      Err(Error::InvalidArgs(_))
    ));
  }

  #[tokio::test]
  async fn test_subordinate_levels_and_sequential_ids() {
    let db = test_db::setup().await;
    let sv = Roster::new(&db);

    sv.create_root("ana").await.unwrap();
    let bia = sv.add_subordinate("0", "bia").await.unwrap();
    let caio = sv.add_subordinate(&bia.id, "caio").await.unwrap();

    assert_eq!(bia.id, "1");
    assert_eq!(bia.level, 1);
    assert_eq!(bia.parent_id.as_deref(), Some("0"));
    assert_eq!(caio.id, "2");
    assert_eq!(caio.level, 2);

    assert!(matches!(
      sv.add_subordinate("9", "duda").await,
      Err(Error::AffiliateNotFound)
    ));
  }

  #[tokio::test]
  async fn test_freed_ids_are_reused_fifo() {
    let db = test_db::setup().await;
    let sv = Roster::new(&db);

    sv.create_root("ana").await.unwrap();
    sv.add_subordinate("0", "bia").await.unwrap();
    sv.add_subordinate("0", "caio").await.unwrap();

    sv.delete("1", DeletePolicy::Detach).await.unwrap();
    sv.delete("2", DeletePolicy::Detach).await.unwrap();

    assert_eq!(sv.add_subordinate("0", "duda").await.unwrap().id, "1");
    assert_eq!(sv.add_subordinate("0", "edu").await.unwrap().id, "2");
    assert_eq!(sv.add_subordinate("0", "fabi").await.unwrap().id, "3");
  }

  #[tokio::test]
  async fn test_edit_updates_fields() {
    let db = test_db::setup().await;
    let sv = Roster::new(&db);
    sv.create_root("ana").await.unwrap();

    let edited = sv
      .edit(
        "0",
        EditAffiliate {
          name: Some("ana maria".into()),
          score: Some(120),
          first_purchase_made: Some(true),
        },
      )
      .await
      .unwrap();

    assert_eq!(edited.name, "ANA MARIA");
    assert_eq!(edited.score, 120);
    assert!(edited.first_purchase_made);

    assert!(matches!(
      sv.edit("0", EditAffiliate { score: Some(-1), ..Default::default() })
        .await,
      Err(Error::InvalidArgs(_))
    ));
  }

  #[tokio::test]
  async fn test_edit_rejects_taken_name() {
    let db = test_db::setup().await;
    let sv = Roster::new(&db);
    sv.create_root("ana").await.unwrap();
    sv.add_subordinate("0", "bia").await.unwrap();

    assert!(matches!(
      sv.edit("1", EditAffiliate { name: Some("Ana".into()), ..Default::default() })
        .await,
      Err(Error::NameTaken)
    ));

    // keeping your own name is not a conflict
    let same = sv
      .edit("1", EditAffiliate { name: Some("bia".into()), ..Default::default() })
      .await
      .unwrap();
    assert_eq!(same.name, "BIA");
  }

  #[tokio::test]
  async fn test_delete_detach_leaves_children_dangling() {
    let db = test_db::setup().await;
    let sv = Roster::new(&db);
    sv.create_root("ana").await.unwrap();
    sv.add_subordinate("0", "bia").await.unwrap();
    sv.add_subordinate("1", "caio").await.unwrap();

    sv.delete("1", DeletePolicy::Detach).await.unwrap();

    let caio = sv.by_id("2").await.unwrap().unwrap();
    assert_eq!(caio.parent_id.as_deref(), Some("1"));
    assert!(!sv.load().await.unwrap().is_valid_hierarchy());
  }

  #[tokio::test]
  async fn test_delete_cascade_removes_subtree() {
    let db = test_db::setup().await;
    let sv = Roster::new(&db);
    sv.create_root("ana").await.unwrap();
    sv.add_subordinate("0", "bia").await.unwrap();
    sv.add_subordinate("1", "caio").await.unwrap();
    sv.add_subordinate("1", "duda").await.unwrap();

    sv.delete("1", DeletePolicy::Cascade).await.unwrap();

    let remaining = sv.all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "0");

    // the whole freed subtree is reusable
    let ids: HashSet<String> = [
      sv.add_subordinate("0", "edu").await.unwrap().id,
      sv.add_subordinate("0", "fabi").await.unwrap().id,
      sv.add_subordinate("0", "gil").await.unwrap().id,
    ]
    .into();
    assert_eq!(ids, HashSet::from(["1".into(), "2".into(), "3".into()]));
  }

  #[tokio::test]
  async fn test_delete_reparent_promotes_children() {
    let db = test_db::setup().await;
    let sv = Roster::new(&db);
    sv.create_root("ana").await.unwrap();
    sv.add_subordinate("0", "bia").await.unwrap();
    sv.add_subordinate("1", "caio").await.unwrap();

    sv.delete("1", DeletePolicy::Reparent).await.unwrap();

    let caio = sv.by_id("2").await.unwrap().unwrap();
    assert_eq!(caio.parent_id.as_deref(), Some("0"));
    assert_eq!(caio.level, 1);
    assert!(sv.load().await.unwrap().is_valid_hierarchy());
  }

  #[tokio::test]
  async fn test_delete_refuse_blocks_non_leaf() {
    let db = test_db::setup().await;
    let sv = Roster::new(&db);
    sv.create_root("ana").await.unwrap();
    sv.add_subordinate("0", "bia").await.unwrap();

    assert!(matches!(
      sv.delete("0", DeletePolicy::Refuse).await,
      Err(Error::HasSubordinates)
    ));

    sv.delete("1", DeletePolicy::Refuse).await.unwrap();
    assert_eq!(sv.all().await.unwrap().len(), 1);
  }
}
