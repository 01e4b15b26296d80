use crate::error::DatabaseError;

use sea_orm::{Database as SeaOrmDatabase, DatabaseConnection};

/// The [`Database`] struct is responsible for interacting with the database.
///
/// The [`Database`] type wraps a [`sea_orm::DatabaseConnection`] and implements the
/// [`crate::BlobsRepository`] trait.
#[derive(Debug, Clone)]
pub struct Database {
    /// The underlying database connection.
    connection: DatabaseConnection,
}

impl Database {
    /// Creates a new [`Database`] instance associated with the provided database URL.
    pub async fn new(database_url: &str) -> Result<Self, DatabaseError> {
        tracing::info!(target: "blob_coordinator::db", database_url, "Connecting to database.");
        let connection = SeaOrmDatabase::connect(database_url).await?;
        Ok(Self { connection })
    }

    /// Returns a reference to the underlying connection.
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}

impl From<DatabaseConnection> for Database {
    fn from(connection: DatabaseConnection) -> Self {
        Self { connection }
    }
}
