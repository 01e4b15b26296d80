//! Command line entry point running the coordinator database migrations.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    tracing::info!(target: "blob_coordinator::migration", "Running database migrations.");
    cli::run_cli(blob_coordinator_migration::Migrator).await;
    tracing::info!(target: "blob_coordinator::migration", "Database migrations complete.")
}
