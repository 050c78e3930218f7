use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Numeric affiliate ids freed by deletion, reused oldest-first.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "free_ids")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub seq: i32,
  pub value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
