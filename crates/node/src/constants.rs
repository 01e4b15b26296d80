/// The default interval between two coordinator ticks in milliseconds.
pub(crate) const DEFAULT_POLLING_INTERVAL_MS: u64 = 1000;

/// The default capacity of the ingestion queue.
pub(crate) const DEFAULT_QUEUE_CAPACITY: usize = blob_coordinator::DEFAULT_QUEUE_CAPACITY;

/// The default delay between two persistence attempts in milliseconds.
pub(crate) const DEFAULT_PERSISTENCE_BACKOFF_DELAY_MS: u64 = 1000;

/// The default database URL.
pub(crate) const DEFAULT_DATABASE_URL: &str = "sqlite://blob_coordinator.db?mode=rwc";

/// The default interval between two development blobs in milliseconds.
pub(crate) const DEFAULT_DEV_BLOB_INTERVAL_MS: u64 = 2000;

/// The default number of blocks in a development blob.
pub(crate) const DEFAULT_DEV_BLOCKS_PER_BLOB: u64 = 20;

/// The default number of blocks in a development batch.
pub(crate) const DEFAULT_DEV_BLOCKS_PER_BATCH: u64 = 5;

/// The default size of the compressed payload of a development blob.
pub(crate) const DEFAULT_DEV_COMPRESSED_DATA_SIZE: usize = 4096;
