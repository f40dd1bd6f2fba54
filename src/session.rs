//! Session

use serde::{Deserialize, Serialize};

/// The signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Identity provider user id
    pub id: String,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Phone number, empty when unknown
    pub phone: String,

    /// Avatar image URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Session {
    /// Up to two uppercase initials for an avatar placeholder.
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}
