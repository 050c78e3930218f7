use crate::{engine, entity::affiliate, prelude::*, sv};

/// Commissions-table assembly: refreshes the persisted ranks, then runs
/// the engine over a fresh snapshot.
pub struct Report<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Report<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Re-derives every affiliate's tier and persists the ones that
  /// changed. Returns how many rows were updated.
  ///
  /// The commission calculator caps payouts by the *stored* rank, so
  /// this must run before commissions are computed.
  pub async fn refresh_ranks(&self) -> Result<usize> {
    let txn = self.db.begin().await?;

    let models = affiliate::Entity::find()
      .order_by_asc(affiliate::Column::Seq)
      .all(&txn)
      .await?;
    let roster = engine::Roster::new(
      models.iter().cloned().map(Into::into).collect(),
    );

    let mut updated = 0;
    for model in models {
      let Some(snapshot) = roster.get(&model.id) else {
        continue;
      };
      let rank = engine::rank::classify(&roster, snapshot);
      if model.rank.as_ref() != Some(&rank) {
        affiliate::ActiveModel { rank: Set(Some(rank)), ..model.into() }
          .update(&txn)
          .await?;
        updated += 1;
      }
    }

    txn.commit().await?;
    Ok(updated)
  }

  pub async fn commissions(
    &self,
    exchange_rate: f64,
  ) -> Result<Vec<engine::AffiliateReport>> {
    self.refresh_ranks().await?;
    let roster = sv::Roster::new(self.db).load().await?;
    Ok(engine::reports(&roster, exchange_rate))
  }
}
