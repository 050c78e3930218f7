use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    // FIFO queue of numeric affiliate ids freed by deletion; `seq` is the
    // deletion order, so the oldest freed id is reused first.
    manager
      .create_table(
        Table::create()
          .table(FreeIds::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(FreeIds::Seq)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(FreeIds::Value).big_integer().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(FreeIds::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum FreeIds {
  Table,
  Seq,
  Value,
}
