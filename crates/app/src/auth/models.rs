//! Auth data models.

use std::fmt;

use platter::session::Session;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Profile fields kept in the provider's user metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Avatar image URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A user as the identity provider reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl Identity {
    /// Map to the local session shape.
    ///
    /// The name falls back to the local part of the email address.
    #[must_use]
    pub fn to_session(&self) -> Session {
        let email = self.email.clone().unwrap_or_default();

        let name = non_blank(self.user_metadata.name.as_deref()).map_or_else(
            || {
                email
                    .split_once('@')
                    .map_or(email.as_str(), |(local, _)| local)
                    .to_string()
            },
            str::to_string,
        );

        Session {
            id: self.id.clone(),
            name,
            email,
            phone: non_blank(self.user_metadata.phone.as_deref())
                .unwrap_or_default()
                .to_string(),
            image: non_blank(self.user_metadata.image.as_deref()).map(str::to_string),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

/// Tokens issued by the identity provider, persisted to restore the session
/// on the next start.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    pub refresh_token: String,

    /// Unix seconds
    #[serde(default)]
    pub expires_at: Option<i64>,

    pub user: Identity,
}

impl fmt::Debug for ProviderSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSession")
            .field("access_token", &"**redacted**")
            .field("refresh_token", &"**redacted**")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

/// Account password, wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")?;
        Ok(())
    }
}

impl Drop for Password {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Sign-up details.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: Password,
}

/// Outcome of registering an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUp {
    /// The provider issued a session straight away.
    SignedIn(Identity),

    /// The account exists but stays signed out until its email is confirmed.
    ConfirmationPending(Identity),
}

impl SignUp {
    /// The registered identity, whether or not a session was issued.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        match self {
            Self::SignedIn(identity) | Self::ConfirmationPending(identity) => identity,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn maps_metadata_into_session() -> TestResult {
        let identity: Identity = serde_json::from_value(serde_json::json!({
            "id": "8d0f",
            "email": "nadia@example.com",
            "user_metadata": {
                "name": "Nadia Islam",
                "phone": "01911223344",
                "image": "data:image/png;base64,AAAA",
                "email_verified": true,
            },
        }))?;

        let session = identity.to_session();

        assert_eq!(session.id, "8d0f");
        assert_eq!(session.name, "Nadia Islam");
        assert_eq!(session.phone, "01911223344");
        assert_eq!(session.image.as_deref(), Some("data:image/png;base64,AAAA"));

        Ok(())
    }

    #[test]
    fn name_falls_back_to_email_local_part() {
        let identity = Identity {
            id: "8d0f".to_string(),
            email: Some("nadia@example.com".to_string()),
            user_metadata: UserMetadata {
                name: Some("  ".to_string()),
                ..UserMetadata::default()
            },
        };

        let session = identity.to_session();

        assert_eq!(session.name, "nadia");
        assert_eq!(session.phone, "");
        assert_eq!(session.image, None);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let password = Password::new("hunter22");
        let session = ProviderSession {
            access_token: "access-secret".to_string(),
            refresh_token: "refresh-secret".to_string(),
            expires_at: None,
            user: Identity {
                id: "8d0f".to_string(),
                email: None,
                user_metadata: UserMetadata::default(),
            },
        };

        let output = format!("{password:?} {session:?}");

        assert!(!output.contains("hunter22"), "password leaked: {output}");
        assert!(!output.contains("secret"), "token leaked: {output}");
    }
}
