//! Order Status

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delivery progress of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted by the kitchen
    Received,

    /// Being cooked
    Preparing,

    /// Out for delivery
    OnTheWay,

    /// Handed to the customer
    Delivered,

    /// Abandoned before delivery
    Cancelled,
}

impl OrderStatus {
    /// The delivery steps in order, excluding [`OrderStatus::Cancelled`].
    pub const STEPS: [OrderStatus; 4] = [
        OrderStatus::Received,
        OrderStatus::Preparing,
        OrderStatus::OnTheWay,
        OrderStatus::Delivered,
    ];

    /// Wire name, as persisted.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Preparing => "preparing",
            Self::OnTheWay => "on_the_way",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Received => "Order Received",
            Self::Preparing => "Preparing",
            Self::OnTheWay => "On the Way",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Order Cancelled",
        }
    }

    /// Position along [`OrderStatus::STEPS`]; `None` for cancelled.
    #[must_use]
    pub const fn step(self) -> Option<usize> {
        match self {
            Self::Received => Some(0),
            Self::Preparing => Some(1),
            Self::OnTheWay => Some(2),
            Self::Delivered => Some(3),
            Self::Cancelled => None,
        }
    }

    /// Delivered and cancelled orders go nowhere else.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Unrecognised status name
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "received" => Ok(Self::Received),
            "preparing" => Ok(Self::Preparing),
            "on_the_way" => Ok(Self::OnTheWay),
            "delivered" => Ok(Self::Delivered),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Rejected status change
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("cannot move order from {from} to {to}")]
pub struct TransitionError {
    /// Current status
    pub from: OrderStatus,

    /// Requested status
    pub to: OrderStatus,
}

/// Which status changes an order accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionPolicy {
    /// Any status may follow any other.
    #[default]
    Permissive,

    /// Steps only move forward (repeats allowed), cancellation only from a
    /// non-terminal status, and terminal statuses are final.
    ForwardOnly,
}

impl TransitionPolicy {
    /// Check whether `from -> to` is allowed.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] when the policy forbids the change.
    pub fn check(self, from: OrderStatus, to: OrderStatus) -> Result<(), TransitionError> {
        match self {
            Self::Permissive => Ok(()),
            Self::ForwardOnly => {
                let allowed = match (from.step(), to.step()) {
                    _ if from == to => true,
                    _ if from.is_terminal() => false,
                    (_, None) => true,
                    (Some(current), Some(next)) => next >= current,
                    (None, Some(_)) => false,
                };

                if allowed {
                    Ok(())
                } else {
                    Err(TransitionError { from, to })
                }
            }
        }
    }
}
