use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Products::Table)
          .if_not_exists()
          .col(ColumnDef::new(Products::Id).string().not_null().primary_key())
          .col(ColumnDef::new(Products::Name).string().not_null())
          .col(ColumnDef::new(Products::Points).integer().not_null())
          // prices are centavos
          .col(ColumnDef::new(Products::PriceCents).big_integer().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Products::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Products {
  Table,
  Id,
  Name,
  Points,
  PriceCents,
}
