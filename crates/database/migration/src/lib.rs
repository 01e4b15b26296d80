//! Database migrations for the blob compression proof coordinator.

pub use sea_orm_migration::prelude::*;

mod m20251018_000001_create_blob_table;

/// The migrator for the coordinator database.
#[derive(Debug)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20251018_000001_create_blob_table::Migration)]
    }
}
