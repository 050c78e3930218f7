pub use sea_orm_migration::prelude::*;

mod m20260715_000001_create_affiliates;
mod m20260715_000002_create_products;
mod m20260715_000003_create_purchases;
mod m20260715_000004_create_snapshots;
mod m20260715_000005_create_free_ids;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260715_000001_create_affiliates::Migration),
      Box::new(m20260715_000002_create_products::Migration),
      Box::new(m20260715_000003_create_purchases::Migration),
      Box::new(m20260715_000004_create_snapshots::Migration),
      Box::new(m20260715_000005_create_free_ids::Migration),
    ]
  }
}
