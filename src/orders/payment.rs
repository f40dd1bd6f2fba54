//! Payment Methods

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the customer pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery
    #[default]
    Cash,

    /// bKash mobile wallet
    Bkash,

    /// Nagad mobile wallet
    Nagad,
}

impl PaymentMethod {
    /// Wire name, as persisted.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bkash => "bkash",
            Self::Nagad => "nagad",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash on Delivery",
            Self::Bkash => "bKash",
            Self::Nagad => "Nagad",
        }
    }

    /// Mobile wallet payments carry a transaction id.
    #[must_use]
    pub const fn requires_transaction_id(self) -> bool {
        !matches!(self, Self::Cash)
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Unrecognised payment method name
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method: {0}")]
pub struct ParsePaymentMethodError(pub String);

impl FromStr for PaymentMethod {
    type Err = ParsePaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "bkash" => Ok(Self::Bkash),
            "nagad" => Ok(Self::Nagad),
            _ => Err(ParsePaymentMethodError(s.to_string())),
        }
    }
}
