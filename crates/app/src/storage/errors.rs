//! Storage errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage error")]
    Sql(#[source] sqlx::Error),

    #[error("failed to encode {key}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored {key} is not valid")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<sqlx::Error> for StorageError {
    fn from(error: sqlx::Error) -> Self {
        Self::Sql(error)
    }
}
