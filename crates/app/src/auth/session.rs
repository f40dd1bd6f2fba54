//! Session service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use platter::session::Session;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::{
    auth::{Identity, IdentityProvider, NewAccount, Password, SessionError, SignUp},
    storage::{self, KeyValueStore, SnapshotWriter, StorageError, USER_KEY},
};

/// Where the process is in its session lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Startup has not finished restoring a session yet.
    #[default]
    Uninitialized,

    SignedOut,

    SignedIn(Session),
}

impl SessionState {
    /// The signed-in session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(session) => Some(session),
            Self::Uninitialized | Self::SignedOut => None,
        }
    }
}

/// Process-wide session, kept in step with the identity provider and
/// mirrored to the `user` key.
pub struct SessionStore {
    provider: Arc<dyn IdentityProvider>,
    state: Arc<RwLock<SessionState>>,
    writer: SnapshotWriter,
}

impl SessionStore {
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, writer: SnapshotWriter) -> Self {
        Self {
            provider,
            state: Arc::new(RwLock::new(SessionState::Uninitialized)),
            writer,
        }
    }

    /// Restore the session and start following provider auth-state changes.
    ///
    /// The locally persisted session is installed first so it is available
    /// while the provider restores its own. Call once per process.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted session cannot be read.
    pub async fn start(&self, store: &dyn KeyValueStore) -> Result<(), SessionError> {
        if let Some(session) = storage::load::<Session>(store, USER_KEY).await? {
            debug!(user_id = %session.id, "loaded persisted session");

            *self.state.write().await = SessionState::SignedIn(session);
        }

        match self.provider.restore().await {
            Ok(identity) => apply(&self.state, &self.writer, identity.as_ref()).await?,
            Err(err) => {
                warn!(error = %err, "failed to restore provider session");

                let mut state = self.state.write().await;

                if *state == SessionState::Uninitialized {
                    *state = SessionState::SignedOut;
                }
            }
        }

        let mut updates = self.provider.subscribe();
        let state = Arc::clone(&self.state);
        let writer = self.writer.clone();

        tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let identity = updates.borrow_and_update().clone();

                if let Err(err) = apply(&state, &writer, identity.as_ref()).await {
                    error!(error = %err, "failed to apply auth state change");
                }
            }
        });

        Ok(())
    }

    async fn install(&self, identity: &Identity) -> Result<Session, SessionError> {
        apply(&self.state, &self.writer, Some(identity)).await?;

        Ok(identity.to_session())
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Replace the session with the one mapped from `identity` and persist it.
async fn apply(
    state: &RwLock<SessionState>,
    writer: &SnapshotWriter,
    identity: Option<&Identity>,
) -> Result<(), StorageError> {
    let mut state = state.write().await;

    match identity.map(Identity::to_session) {
        Some(session) => {
            writer.save(USER_KEY, &session)?;
            *state = SessionState::SignedIn(session);
        }
        None => {
            writer.remove(USER_KEY);
            *state = SessionState::SignedOut;
        }
    }

    Ok(())
}

#[async_trait]
impl SessionService for SessionStore {
    async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    async fn current(&self) -> Option<Session> {
        self.state.read().await.session().cloned()
    }

    async fn is_authenticated(&self) -> bool {
        self.state.read().await.session().is_some()
    }

    async fn sign_in(&self, email: &str, password: &Password) -> Result<Session, SessionError> {
        let identity = self.provider.sign_in(email, password).await?;

        info!(user_id = %identity.id, "session started");

        self.install(&identity).await
    }

    async fn sign_up(&self, account: &NewAccount) -> Result<Option<Session>, SessionError> {
        match self.provider.sign_up(account).await? {
            SignUp::SignedIn(identity) => {
                info!(user_id = %identity.id, "account created");

                self.install(&identity).await.map(Some)
            }
            SignUp::ConfirmationPending(identity) => {
                info!(user_id = %identity.id, "account created; awaiting email confirmation");

                Ok(None)
            }
        }
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        let remote = self.provider.sign_out().await;

        apply(&self.state, &self.writer, None).await?;

        info!("session cleared");

        remote.map_err(SessionError::Provider)
    }

    async fn update_profile_image(&self, image: &str) -> Result<Session, SessionError> {
        if !self.is_authenticated().await {
            return Err(SessionError::NotSignedIn);
        }

        let identity = self.provider.update_user_image(image).await?;

        self.install(&identity).await
    }
}

#[automock]
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Current lifecycle state.
    async fn state(&self) -> SessionState;

    /// The signed-in session, if any.
    async fn current(&self) -> Option<Session>;

    /// Whether someone is signed in.
    async fn is_authenticated(&self) -> bool;

    /// Sign in with email and password.
    async fn sign_in(&self, email: &str, password: &Password) -> Result<Session, SessionError>;

    /// Create an account and sign in to it. Returns `None` when the
    /// provider wants the email confirmed first; nothing is installed then.
    async fn sign_up(&self, account: &NewAccount) -> Result<Option<Session>, SessionError>;

    /// Sign out. Local state is cleared even when the provider call fails,
    /// in which case that failure is returned.
    async fn sign_out(&self) -> Result<(), SessionError>;

    /// Replace the avatar image.
    async fn update_profile_image(&self, image: &str) -> Result<Session, SessionError>;
}
