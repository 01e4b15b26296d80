use crate::{constants, launch::resolve_chain_cursor, CoordinatorCollaborators};
use std::{sync::Arc, time::Duration};

use alloy_primitives::B256;
use blob_coordinator::{BlobCompressionProofCoordinator, CoordinatorConfig, GenesisChainState};
use blob_coordinator_db::{
    Database, PersistenceRetryConfig, PersistenceRetryer, RetryingBlobsRepository,
};
use blob_coordinator_migration::{Migrator, MigratorTrait};

/// The arguments of the blob compression proof coordinator.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "blob-coordinator", about = "Coordinates the compression proofs of rollup blobs")]
pub struct BlobCoordinatorArgs {
    /// Coordinator args.
    #[command(flatten)]
    pub coordinator_args: CoordinatorArgs,
    /// Persistence retry args.
    #[command(flatten)]
    pub persistence_args: PersistenceRetryArgs,
    /// Genesis chain state args.
    #[command(flatten)]
    pub genesis_args: GenesisArgs,
    /// Database args.
    #[command(flatten)]
    pub database_args: DatabaseArgs,
    /// Development blob producer args.
    #[command(flatten)]
    pub dev_args: DevArgs,
}

impl BlobCoordinatorArgs {
    /// Validate the arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.coordinator_args.queue_capacity == 0 {
            return Err("The coordinator queue capacity must be at least 1".to_string());
        }
        if self.coordinator_args.polling_interval_ms == 0 {
            return Err("The coordinator polling interval must be at least 1ms".to_string());
        }
        if self.dev_args.blocks_per_blob == 0 || self.dev_args.blocks_per_batch == 0 {
            return Err("Development blobs and batches must contain at least one block".to_string());
        }

        Ok(())
    }

    /// Returns the [`CoordinatorConfig`].
    pub const fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig::new(
            Duration::from_millis(self.coordinator_args.polling_interval_ms),
            self.coordinator_args.queue_capacity,
        )
    }

    /// Returns the [`PersistenceRetryConfig`].
    pub const fn persistence_retry_config(&self) -> PersistenceRetryConfig {
        PersistenceRetryConfig {
            backoff_delay: Duration::from_millis(self.persistence_args.backoff_delay_ms),
            max_retries: self.persistence_args.max_retries,
            timeout: match self.persistence_args.timeout_ms {
                Some(timeout) => Some(Duration::from_millis(timeout)),
                None => None,
            },
        }
    }

    /// Returns the [`GenesisChainState`].
    pub const fn genesis(&self) -> GenesisChainState {
        GenesisChainState {
            shnarf: self.genesis_args.shnarf,
            data_hash: self.genesis_args.data_hash,
            end_block_number: self.genesis_args.end_block_number,
        }
    }

    /// Connects to the database, runs the migrations and returns a stopped coordinator resuming
    /// the shnarf chain from the latest persisted blob.
    pub async fn build(
        &self,
        collaborators: CoordinatorCollaborators,
    ) -> eyre::Result<BlobCompressionProofCoordinator> {
        let database = Database::new(&self.database_args.url).await?;
        Migrator::up(database.connection(), None).await?;
        let repository = Arc::new(RetryingBlobsRepository::new(
            database,
            PersistenceRetryer::new(self.persistence_retry_config()),
        ));

        let cursor = resolve_chain_cursor(repository.as_ref(), self.genesis()).await?;
        tracing::info!(target: "blob_coordinator::node", ?cursor, "Resolved shnarf chain cursor");

        Ok(BlobCompressionProofCoordinator::new(
            self.coordinator_config(),
            cursor,
            collaborators.zk_state_provider,
            collaborators.shnarf_calculator,
            collaborators.prover,
            repository,
            collaborators.proof_handler,
        ))
    }
}

/// The arguments for the coordinator queue and scheduler.
#[derive(Debug, Clone, clap::Args)]
pub struct CoordinatorArgs {
    /// The interval between two scheduler ticks in milliseconds. Each tick dequeues at most one
    /// blob.
    #[arg(long = "coordinator.polling-interval-ms", default_value_t = constants::DEFAULT_POLLING_INTERVAL_MS)]
    pub polling_interval_ms: u64,
    /// The capacity of the ingestion queue.
    #[arg(long = "coordinator.queue-capacity", default_value_t = constants::DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,
}

impl Default for CoordinatorArgs {
    fn default() -> Self {
        Self {
            polling_interval_ms: constants::DEFAULT_POLLING_INTERVAL_MS,
            queue_capacity: constants::DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// The arguments for the persistence retries.
#[derive(Debug, Clone, clap::Args)]
pub struct PersistenceRetryArgs {
    /// The delay between two persistence attempts in milliseconds.
    #[arg(long = "persistence.backoff-delay-ms", default_value_t = constants::DEFAULT_PERSISTENCE_BACKOFF_DELAY_MS)]
    pub backoff_delay_ms: u64,
    /// The maximum number of retries of a persistence operation, unbounded if unset.
    #[arg(long = "persistence.max-retries")]
    pub max_retries: Option<usize>,
    /// The overall timeout of a persistence operation in milliseconds, including retries.
    #[arg(long = "persistence.timeout-ms")]
    pub timeout_ms: Option<u64>,
}

/// The arguments describing the chain state preceding the first blob.
#[derive(Debug, Clone, clap::Args)]
pub struct GenesisArgs {
    /// The shnarf preceding the first blob.
    #[arg(long = "genesis.shnarf", value_name = "SHNARF", default_value_t = B256::ZERO)]
    pub shnarf: B256,
    /// The data hash preceding the first blob.
    #[arg(long = "genesis.data-hash", value_name = "DATA_HASH", default_value_t = B256::ZERO)]
    pub data_hash: B256,
    /// The last block number before the first blob. Enables the contiguity check of the first
    /// blob.
    #[arg(long = "genesis.end-block-number", value_name = "BLOCK_NUMBER")]
    pub end_block_number: Option<u64>,
}

/// The database arguments.
#[derive(Debug, Clone, clap::Args)]
pub struct DatabaseArgs {
    /// The database connection URL.
    #[arg(long = "db.url", value_name = "DB_URL", default_value = constants::DEFAULT_DATABASE_URL)]
    pub url: String,
}

/// The arguments for the development blob producer.
#[derive(Debug, Clone, clap::Args)]
pub struct DevArgs {
    /// The interval between two development blobs in milliseconds.
    #[arg(long = "dev.blob-interval-ms", default_value_t = constants::DEFAULT_DEV_BLOB_INTERVAL_MS)]
    pub blob_interval_ms: u64,
    /// The number of blocks in a development blob.
    #[arg(long = "dev.blocks-per-blob", default_value_t = constants::DEFAULT_DEV_BLOCKS_PER_BLOB)]
    pub blocks_per_blob: u64,
    /// The number of blocks in a development batch.
    #[arg(long = "dev.blocks-per-batch", default_value_t = constants::DEFAULT_DEV_BLOCKS_PER_BATCH)]
    pub blocks_per_batch: u64,
    /// The size of the compressed payload of a development blob.
    #[arg(long = "dev.compressed-data-size", default_value_t = constants::DEFAULT_DEV_COMPRESSED_DATA_SIZE)]
    pub compressed_data_size: usize,
    /// The number of development blobs to produce, unbounded if unset.
    #[arg(long = "dev.blob-count")]
    pub blob_count: Option<u64>,
}

impl Default for DevArgs {
    fn default() -> Self {
        Self {
            blob_interval_ms: constants::DEFAULT_DEV_BLOB_INTERVAL_MS,
            blocks_per_blob: constants::DEFAULT_DEV_BLOCKS_PER_BLOB,
            blocks_per_batch: constants::DEFAULT_DEV_BLOCKS_PER_BATCH,
            compressed_data_size: constants::DEFAULT_DEV_COMPRESSED_DATA_SIZE,
            blob_count: None,
        }
    }
}
