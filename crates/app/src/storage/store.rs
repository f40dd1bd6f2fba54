//! Key-value store.

use async_trait::async_trait;
use mockall::automock;

use crate::storage::StorageError;

#[automock]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the blob stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
