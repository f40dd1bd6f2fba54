//! Orders service errors.

use platter::orders::{OrderStatus, TransitionError};
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("storage error")]
    Storage(#[from] StorageError),
}

impl From<TransitionError> for OrdersServiceError {
    fn from(error: TransitionError) -> Self {
        Self::InvalidTransition {
            from: error.from,
            to: error.to,
        }
    }
}
