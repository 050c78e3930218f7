use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::purchase;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  pub name: String,
  /// LP credited to the buyer's score per unit.
  pub points: i32,
  pub price_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "purchase::Entity")]
  Purchases,
}

impl Related<purchase::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Purchases.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
