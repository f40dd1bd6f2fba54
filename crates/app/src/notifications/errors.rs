//! Notifier errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("failed to reach notification endpoint")]
    Http(#[from] reqwest::Error),

    #[error("notification transport unavailable: {0}")]
    Unavailable(String),

    #[error("notification permission denied")]
    PermissionDenied,
}
