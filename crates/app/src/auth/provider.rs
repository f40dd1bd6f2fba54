//! Identity provider boundary.

use async_trait::async_trait;
use mockall::automock;
use tokio::sync::watch;

use crate::auth::{Identity, IdentityError, NewAccount, Password, SignUp};

#[automock]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange email and password for a signed-in identity.
    async fn sign_in(&self, email: &str, password: &Password) -> Result<Identity, IdentityError>;

    /// Register a new account with profile metadata. Only
    /// [`SignUp::SignedIn`] leaves a provider session behind.
    async fn sign_up(&self, account: &NewAccount) -> Result<SignUp, IdentityError>;

    /// Invalidate the remote session. Local provider state is dropped
    /// whatever the outcome.
    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// Bring back a previously persisted session, refreshing it if needed.
    async fn restore(&self) -> Result<Option<Identity>, IdentityError>;

    /// Replace the avatar image in the user's metadata.
    async fn update_user_image(&self, image: &str) -> Result<Identity, IdentityError>;

    /// Auth-state changes pushed by the provider.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}
