use serde::{Deserialize, Serialize};

use crate::{
  entity::{affiliate, product, purchase},
  prelude::*,
};

pub struct Purchase<'a> {
  db: &'a DatabaseConnection,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PurchaseItem {
  pub product_id: String,
  pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct Receipt {
  pub points_added: i64,
  pub price_cents: i64,
  pub new_score: i64,
}

impl<'a> Purchase<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Books a purchase: appends one ledger row per item and credits the
  /// summed points to the affiliate's score. The first-purchase flag is
  /// a manual toggle on the affiliate and is deliberately not touched
  /// here.
  pub async fn record(
    &self,
    affiliate_id: &str,
    items: &[PurchaseItem],
  ) -> Result<Receipt> {
    if items.is_empty() {
      return Err(Error::InvalidArgs("no items selected".into()));
    }

    let txn = self.db.begin().await?;

    let buyer = affiliate::Entity::find_by_id(affiliate_id)
      .one(&txn)
      .await?
      .ok_or(Error::AffiliateNotFound)?;

    let now = Utc::now().naive_utc();
    let mut points_added: i64 = 0;
    let mut price_cents: i64 = 0;

    for item in items {
      if item.quantity <= 0 {
        return Err(Error::InvalidArgs("quantity must be positive".into()));
      }

      let product = product::Entity::find_by_id(item.product_id.as_str())
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound)?;

      let points = product.points as i64 * item.quantity as i64;
      let price = product.price_cents * item.quantity as i64;
      points_added += points;
      price_cents += price;

      purchase::ActiveModel {
        id: NotSet,
        affiliate_id: Set(buyer.id.clone()),
        product_id: Set(product.id),
        quantity: Set(item.quantity),
        points: Set(points),
        price_cents: Set(price),
        created_at: Set(now),
      }
      .insert(&txn)
      .await?;
    }

    let new_score = buyer.score + points_added;
    affiliate::ActiveModel { score: Set(new_score), ..buyer.into() }
      .update(&txn)
      .await?;

    txn.commit().await?;
    Ok(Receipt { points_added, price_cents, new_score })
  }

  /// Ledger rows for one affiliate, oldest first.
  pub async fn history(
    &self,
    affiliate_id: &str,
  ) -> Result<Vec<purchase::Model>> {
    let rows = purchase::Entity::find()
      .filter(purchase::Column::AffiliateId.eq(affiliate_id))
      .order_by_asc(purchase::Column::Id)
      .all(self.db)
      .await?;
    Ok(rows)
  }
}
