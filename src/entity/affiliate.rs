use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::purchase;

/// Qualification tier. The tier caps how many levels deep an affiliate
/// may earn commission from its downstream organization.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Rank {
  #[sea_orm(string_value = "nao_qualificado")]
  #[default]
  NotQualified,
  #[sea_orm(string_value = "associado")]
  Associate,
  #[sea_orm(string_value = "construtor")]
  Builder,
  #[sea_orm(string_value = "construtor_elite")]
  EliteBuilder,
}

impl Rank {
  /// How many levels below the affiliate pay commission.
  pub fn level_cap(&self) -> u32 {
    match self {
      Rank::NotQualified => 0,
      Rank::Associate => 2,
      Rank::Builder | Rank::EliteBuilder => 3,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Rank::NotQualified => "Não Qualificado",
      Rank::Associate => "Associado",
      Rank::Builder => "Construtor",
      Rank::EliteBuilder => "Construtor Elite",
    }
  }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "affiliates")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  #[sea_orm(unique)]
  pub name: String,
  pub score: i64,
  /// `None` marks the single root affiliate.
  pub parent_id: Option<String>,
  pub level: i32,
  pub first_purchase_made: bool,
  /// Cached qualification tier; refreshed by `sv::Report` before
  /// commissions are computed.
  pub rank: Option<Rank>,
  /// Insertion order of the roster.
  pub seq: i64,
  pub created_at: DateTime,
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
