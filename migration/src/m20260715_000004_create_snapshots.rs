use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Snapshots::Table)
          .if_not_exists()
          .col(ColumnDef::new(Snapshots::Id).string().not_null().primary_key())
          .col(ColumnDef::new(Snapshots::Name).string().null())
          .col(ColumnDef::new(Snapshots::Data).text().not_null())
          .col(ColumnDef::new(Snapshots::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Snapshots::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Snapshots {
  Table,
  Id,
  Name,
  Data,
  CreatedAt,
}
