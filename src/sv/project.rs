use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  entity::{affiliate, free_id, purchase, snapshot},
  prelude::*,
};

/// What a saved project contains: the roster plus the id-allocator
/// queue. The purchase ledger is live history and stays out.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectData {
  pub affiliates: Vec<affiliate::Model>,
  pub free_ids: Vec<i64>,
}

pub struct Project<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Project<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn save(&self, name: Option<String>) -> Result<snapshot::Model> {
    let affiliates = affiliate::Entity::find()
      .order_by_asc(affiliate::Column::Seq)
      .all(self.db)
      .await?;
    let free_ids = free_id::Entity::find()
      .order_by_asc(free_id::Column::Seq)
      .all(self.db)
      .await?
      .into_iter()
      .map(|free| free.value)
      .collect();

    let data = json::to_string(&ProjectData { affiliates, free_ids })
      .map_err(|e| Error::Internal(format!("failed to encode project: {e}")))?;

    let now = Utc::now().naive_utc();
    let model = snapshot::ActiveModel {
      id: Set(Uuid::new_v4().to_string()),
      name: Set(name),
      data: Set(data),
      created_at: Set(now),
    }
    .insert(self.db)
    .await?;

    info!("saved project snapshot {}", model.id);
    Ok(model)
  }

  /// Replaces the live roster and allocator state with the snapshot's.
  /// The purchase ledger is cleared: its rows describe a roster that no
  /// longer exists. Returns the restored affiliate count.
  pub async fn open(&self, id: &str) -> Result<usize> {
    let snap = snapshot::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::SnapshotNotFound)?;

    let data: ProjectData = json::from_str(&snap.data)
      .map_err(|e| Error::Internal(format!("failed to decode project: {e}")))?;

    let txn = self.db.begin().await?;

    purchase::Entity::delete_many().exec(&txn).await?;
    affiliate::Entity::delete_many().exec(&txn).await?;
    free_id::Entity::delete_many().exec(&txn).await?;

    let count = data.affiliates.len();
    for model in data.affiliates {
      affiliate::ActiveModel {
        id: Set(model.id),
        name: Set(model.name),
        score: Set(model.score),
        parent_id: Set(model.parent_id),
        level: Set(model.level),
        first_purchase_made: Set(model.first_purchase_made),
        rank: Set(model.rank),
        seq: Set(model.seq),
        created_at: Set(model.created_at),
      }
      .insert(&txn)
      .await?;
    }
    for value in data.free_ids {
      free_id::ActiveModel { seq: NotSet, value: Set(value) }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    info!("restored project snapshot {} ({count} affiliates)", snap.id);
    Ok(count)
  }

  pub async fn list(&self) -> Result<Vec<snapshot::Model>> {
    let snapshots = snapshot::Entity::find()
      .order_by_desc(snapshot::Column::CreatedAt)
      .all(self.db)
      .await?;
    Ok(snapshots)
  }
}
