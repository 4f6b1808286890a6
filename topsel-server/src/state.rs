//! Shared application state: the connection pool and the token codec.
//!
//! Each request checks out one pooled [`Database`] and moves it onto the
//! blocking thread pool for the engine call; SQLite connections are not
//! `Sync`, so a connection is never shared between tasks.

use std::sync::Arc;

use deadpool::managed::{self, Metrics, Pool, RecycleResult};
use topsel::database::DatabaseConfig;
use topsel::directory::TokenCodec;
use topsel::{AccountDirectory, Database};

/// A deadpool manager that opens library [`Database`] connections.
#[derive(Debug)]
pub struct DatabaseManager {
    config: DatabaseConfig,
}

impl DatabaseManager {
    /// Creates a manager that opens connections with the given config.
    #[must_use]
    pub const fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

impl managed::Manager for DatabaseManager {
    type Type = Database;
    type Error = topsel::Error;

    async fn create(&self) -> Result<Database, Self::Error> {
        let config = self.config.clone();
        // Opening touches the filesystem and runs schema checks
        tokio::task::spawn_blocking(move || Database::open(config))
            .await
            .map_err(|e| topsel::Error::Io(std::io::Error::other(e)))?
    }

    async fn recycle(&self, _conn: &mut Database, _metrics: &Metrics) -> RecycleResult<Self::Error> {
        Ok(())
    }
}

/// The connection pool type used by every handler.
pub type DbPool = Pool<DatabaseManager>;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Pool of database connections, one checked out per request.
    pub pool: DbPool,
    /// Resolves bearer tokens to identities.
    pub directory: Arc<dyn AccountDirectory + Send + Sync>,
    /// Issues session tokens at login.
    pub tokens: Arc<TokenCodec>,
}

impl AppState {
    /// Builds the state for a database path, token secret and pool size.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be built.
    pub fn new(
        db_config: DatabaseConfig,
        token_secret: &str,
        token_ttl: std::time::Duration,
        pool_size: usize,
    ) -> Result<Self, crate::error::CliError> {
        let codec = Arc::new(TokenCodec::new(token_secret, token_ttl));
        let pool = Pool::builder(DatabaseManager::new(db_config))
            .max_size(pool_size)
            .build()
            .map_err(|e| crate::error::CliError::Config(e.to_string()))?;
        Ok(Self {
            pool,
            directory: codec.clone(),
            tokens: codec,
        })
    }
}
