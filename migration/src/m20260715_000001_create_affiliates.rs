use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Affiliates::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Affiliates::Id).string().not_null().primary_key(),
          )
          .col(ColumnDef::new(Affiliates::Name).string().not_null())
          .col(
            ColumnDef::new(Affiliates::Score)
              .big_integer()
              .not_null()
              .default(0),
          )
          // NULL parent marks the single root affiliate. No foreign key:
          // the `detach` delete policy leaves children pointing at a
          // removed parent, which callers must surface before rendering.
          .col(ColumnDef::new(Affiliates::ParentId).string().null())
          .col(ColumnDef::new(Affiliates::Level).integer().not_null())
          .col(
            ColumnDef::new(Affiliates::FirstPurchaseMade)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(ColumnDef::new(Affiliates::Rank).string().null())
          .col(ColumnDef::new(Affiliates::Seq).big_integer().not_null())
          .col(ColumnDef::new(Affiliates::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_affiliates_name")
          .table(Affiliates::Table)
          .col(Affiliates::Name)
          .unique()
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_affiliates_parent")
          .table(Affiliates::Table)
          .col(Affiliates::ParentId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Affiliates::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Affiliates {
  Table,
  Id,
  Name,
  Score,
  ParentId,
  Level,
  FirstPurchaseMade,
  Rank,
  Seq,
  CreatedAt,
}
