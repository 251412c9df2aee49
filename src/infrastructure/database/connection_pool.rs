use crate::shared::config::DatabaseConfig;
use crate::shared::error::AppError;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::sync::Arc;

#[derive(Clone)]
pub struct ConnectionPool {
    pool: Arc<SqlitePool>,
}

impl ConnectionPool {
    /// Opens (creating on first use) the local database. A host without a
    /// usable embedded database surfaces here as `StorageUnavailable`.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await
            .map_err(|err| AppError::StorageUnavailable(err.to_string()))?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Private in-memory database on a single pooled connection; each call
    /// gets its own isolated store.
    pub async fn from_memory() -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|err| AppError::StorageUnavailable(err.to_string()))?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(self.pool.as_ref())
            .await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
