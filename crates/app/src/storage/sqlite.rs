//! SQLite-backed key-value store.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{
    SqlitePool, query, query_scalar,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::debug;

use crate::storage::{KeyValueStore, StorageError};

const CREATE_KV_TABLE_SQL: &str = include_str!("sql/create_kv_table.sql");
const GET_VALUE_SQL: &str = include_str!("sql/get_value.sql");
const SET_VALUE_SQL: &str = include_str!("sql/set_value.sql");
const REMOVE_VALUE_SQL: &str = include_str!("sql/remove_value.sql");

#[derive(Debug, Clone)]
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
}

impl SqliteKeyValueStore {
    /// Open the database at `database_url`, creating the file and table if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the database cannot be opened.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await?;

        Self::with_pool(pool).await
    }

    /// Private in-memory database, gone when the store is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        // Every connection to `:memory:` is a separate database, so pin one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        query(CREATE_KV_TABLE_SQL).execute(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = query_scalar::<_, String>(GET_VALUE_SQL)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        query(SET_VALUE_SQL)
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;

        debug!(key, bytes = value.len(), "stored value");

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        query(REMOVE_VALUE_SQL).bind(key).execute(&self.pool).await?;

        debug!(key, "removed value");

        Ok(())
    }
}
