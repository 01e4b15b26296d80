//! A library responsible for persisting proven blobs.

mod db;
pub use db::Database;

mod error;
pub use error::DatabaseError;

mod models;
pub use models::*;

mod operations;
pub use operations::BlobsRepository;

mod retry;
pub use retry::{CanRetry, PersistenceRetryConfig, PersistenceRetryer, RetryError};

mod retrying;
pub use retrying::RetryingBlobsRepository;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use sea_orm::DbErr;
