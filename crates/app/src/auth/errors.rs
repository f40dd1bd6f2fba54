//! Auth errors.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur when talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider refused the request; carries its message.
    #[error("{0}")]
    Rejected(String),

    /// The provider returned a non-2xx response or unexpected body.
    #[error("unexpected response from identity provider: {0}")]
    UnexpectedResponse(String),

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotSignedIn,

    /// The provider's persisted session could not be read or written.
    #[error("session storage error")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not signed in")]
    NotSignedIn,

    #[error(transparent)]
    Provider(#[from] IdentityError),

    #[error("storage error")]
    Storage(#[from] StorageError),
}
