//! JSON blob helpers.

use serde::{Serialize, de::DeserializeOwned};

use crate::storage::{KeyValueStore, StorageError};

/// Load and decode the blob under `key`. A missing key is `None`.
///
/// # Errors
///
/// Returns an error if the store fails or the blob does not decode.
pub async fn load<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Decode {
            key: key.to_string(),
            source,
        })
}

/// Encode `value` for storage under `key`.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })
}
