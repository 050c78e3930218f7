use sea_orm_migration::prelude::*;

use super::{
  m20260715_000001_create_affiliates::Affiliates,
  m20260715_000002_create_products::Products,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Purchases::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Purchases::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Purchases::AffiliateId).string().not_null())
          .col(ColumnDef::new(Purchases::ProductId).string().not_null())
          .col(ColumnDef::new(Purchases::Quantity).integer().not_null())
          .col(ColumnDef::new(Purchases::Points).big_integer().not_null())
          .col(ColumnDef::new(Purchases::PriceCents).big_integer().not_null())
          .col(ColumnDef::new(Purchases::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_purchases_affiliate")
              .from(Purchases::Table, Purchases::AffiliateId)
              .to(Affiliates::Table, Affiliates::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_purchases_product")
              .from(Purchases::Table, Purchases::ProductId)
              .to(Products::Table, Products::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_purchases_affiliate")
          .table(Purchases::Table)
          .col(Purchases::AffiliateId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Purchases::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Purchases {
  Table,
  Id,
  AffiliateId,
  ProductId,
  Quantity,
  Points,
  PriceCents,
  CreatedAt,
}
