//! Supabase Auth (GoTrue) client.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::{
    auth::{
        Identity, IdentityError, IdentityProvider, NewAccount, Password, ProviderSession, SignUp,
    },
    storage::{self, AUTH_TOKEN_KEY, KeyValueStore},
};

/// Configuration for connecting to a Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `"https://xyzcompany.supabase.co"`.
    pub url: String,

    /// Public anon key sent as the `apikey` header.
    pub anon_key: String,
}

/// HTTP client for the Supabase Auth API.
///
/// The current provider session is persisted under [`AUTH_TOKEN_KEY`] and
/// every sign-in, refresh, or sign-out is broadcast to subscribers.
pub struct SupabaseClient {
    config: SupabaseConfig,
    http: Client,
    store: Arc<dyn KeyValueStore>,
    session: RwLock<Option<ProviderSession>>,
    state: watch::Sender<Option<Identity>>,
}

impl SupabaseClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: SupabaseConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(None);

        Self {
            config,
            http: Client::new(),
            store,
            session: RwLock::new(None),
            state,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.url.trim_end_matches('/'))
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.config.anon_key)
    }

    async fn access_token(&self) -> Result<String, IdentityError> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|session| session.access_token.clone())
            .ok_or(IdentityError::NotSignedIn)
    }

    async fn install(&self, session: ProviderSession) -> Result<Identity, IdentityError> {
        let identity = session.user.clone();

        self.store
            .set(AUTH_TOKEN_KEY, &storage::encode(AUTH_TOKEN_KEY, &session)?)
            .await?;

        *self.session.write().await = Some(session);

        self.state.send_replace(Some(identity.clone()));

        Ok(identity)
    }

    async fn clear(&self) -> Result<(), IdentityError> {
        *self.session.write().await = None;

        self.state.send_replace(None);

        self.store.remove(AUTH_TOKEN_KEY).await?;

        Ok(())
    }

    async fn fetch_user(&self, access_token: &str) -> Result<Identity, IdentityError> {
        let response = self
            .request(self.http.get(self.endpoint("user")))
            .bearer_auth(access_token)
            .send()
            .await?;

        Ok(check(response, "get user").await?.json().await?)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ProviderSession, IdentityError> {
        let response = self
            .request(self.http.post(self.endpoint("token?grant_type=refresh_token")))
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        Ok(check(response, "refresh").await?.json().await?)
    }
}

impl fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    async fn sign_in(&self, email: &str, password: &Password) -> Result<Identity, IdentityError> {
        let body = serde_json::json!({
            "email": email,
            "password": password.expose(),
        });

        let response = self
            .request(self.http.post(self.endpoint("token?grant_type=password")))
            .json(&body)
            .send()
            .await?;

        let session: ProviderSession = check(response, "sign-in").await?.json().await?;

        info!(user_id = %session.user.id, "signed in");

        self.install(session).await
    }

    async fn sign_up(&self, account: &NewAccount) -> Result<SignUp, IdentityError> {
        let body = serde_json::json!({
            "email": account.email,
            "password": account.password.expose(),
            "data": {
                "name": account.name,
                "phone": account.phone,
            },
        });

        let response = self
            .request(self.http.post(self.endpoint("signup")))
            .json(&body)
            .send()
            .await?;

        match check(response, "sign-up")
            .await?
            .json::<SignUpResponse>()
            .await?
        {
            SignUpResponse::Session(session) => {
                info!(user_id = %session.user.id, "signed up");

                self.install(session).await.map(SignUp::SignedIn)
            }
            SignUpResponse::Pending(identity) => {
                info!(user_id = %identity.id, "signed up; email confirmation pending");

                Ok(SignUp::ConfirmationPending(identity))
            }
        }
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        let Ok(access_token) = self.access_token().await else {
            return self.clear().await;
        };

        let result = self
            .request(self.http.post(self.endpoint("logout")))
            .bearer_auth(access_token)
            .send()
            .await;

        self.clear().await?;

        check(result?, "sign-out").await?;

        info!("signed out");

        Ok(())
    }

    async fn restore(&self) -> Result<Option<Identity>, IdentityError> {
        let Some(session) =
            storage::load::<ProviderSession>(self.store.as_ref(), AUTH_TOKEN_KEY).await?
        else {
            debug!("no persisted session");
            self.state.send_replace(None);

            return Ok(None);
        };

        match self.fetch_user(&session.access_token).await {
            Ok(user) => self.install(ProviderSession { user, ..session }).await.map(Some),
            Err(IdentityError::Rejected(message)) => {
                debug!(%message, "access token rejected; refreshing");

                match self.refresh(&session.refresh_token).await {
                    Ok(refreshed) => self.install(refreshed).await.map(Some),
                    Err(IdentityError::Rejected(message)) => {
                        warn!(%message, "persisted session expired");
                        self.clear().await?;

                        Ok(None)
                    }
                    Err(err) => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    async fn update_user_image(&self, image: &str) -> Result<Identity, IdentityError> {
        let access_token = self.access_token().await?;

        let response = self
            .request(self.http.put(self.endpoint("user")))
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "data": { "image": image } }))
            .send()
            .await?;

        let user: Identity = check(response, "update user").await?.json().await?;

        let Some(session) = self.session.read().await.clone() else {
            return Err(IdentityError::NotSignedIn);
        };

        self.install(ProviderSession { user, ..session }).await
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.state.subscribe()
    }
}

/// Map a non-2xx response to an error. Client errors carry the provider's
/// own message.
async fn check(response: Response, operation: &str) -> Result<Response, IdentityError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();

    if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| format!("{operation} failed with status {status}"));

        return Err(IdentityError::Rejected(message));
    }

    Err(IdentityError::UnexpectedResponse(format!(
        "{operation} request failed with status {status}: {text}"
    )))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(ProviderSession),
    Pending(Identity),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.error_description)
            .or(self.message)
            .or(self.error)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path, query_param},
    };

    use crate::storage::SqliteKeyValueStore;

    use super::*;

    fn user_json(name: &str) -> serde_json::Value {
        json!({
            "id": "6f1c",
            "email": "rahim@example.com",
            "user_metadata": { "name": name, "phone": "01712345678" },
        })
    }

    fn session_json(access_token: &str, name: &str) -> serde_json::Value {
        json!({
            "access_token": access_token,
            "refresh_token": "refresh-1",
            "expires_at": 1_900_000_000,
            "token_type": "bearer",
            "user": user_json(name),
        })
    }

    async fn client(
        server: &MockServer,
    ) -> Result<(Arc<SqliteKeyValueStore>, SupabaseClient), IdentityError> {
        let store = Arc::new(SqliteKeyValueStore::in_memory().await?);

        let client = SupabaseClient::new(
            SupabaseConfig {
                url: server.uri(),
                anon_key: "anon-key".to_string(),
            },
            store.clone(),
        );

        Ok((store, client))
    }

    #[tokio::test]
    async fn sign_in_persists_and_broadcasts_session() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", "anon-key"))
            .and(body_partial_json(json!({ "email": "rahim@example.com" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_json("access-1", "Rahim")))
            .expect(1)
            .mount(&server)
            .await;

        let (store, client) = client(&server).await?;
        let updates = client.subscribe();

        let identity = client
            .sign_in("rahim@example.com", &Password::new("secret1"))
            .await?;

        assert_eq!(identity.to_session().name, "Rahim");
        assert_eq!(updates.borrow().as_ref().map(|user| user.id.as_str()), Some("6f1c"));
        assert!(store.get(AUTH_TOKEN_KEY).await?.is_some(), "session should be persisted");

        Ok(())
    }

    #[tokio::test]
    async fn rejected_sign_in_carries_provider_message() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": 400,
                "error_code": "invalid_credentials",
                "msg": "Invalid login credentials",
            })))
            .mount(&server)
            .await;

        let (_store, client) = client(&server).await?;

        let result = client
            .sign_in("rahim@example.com", &Password::new("wrong-password"))
            .await;

        assert!(
            matches!(result, Err(IdentityError::Rejected(ref message)) if message == "Invalid login credentials"),
            "expected Rejected, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn sign_up_sends_profile_metadata() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .and(body_partial_json(json!({
                "email": "rahim@example.com",
                "data": { "name": "Rahim", "phone": "01712345678" },
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json("Rahim")))
            .expect(1)
            .mount(&server)
            .await;

        let (store, client) = client(&server).await?;

        let signed_up = client
            .sign_up(&NewAccount {
                name: "Rahim".to_string(),
                email: "rahim@example.com".to_string(),
                phone: "01712345678".to_string(),
                password: Password::new("secret1"),
            })
            .await?;

        assert!(
            matches!(signed_up, SignUp::ConfirmationPending(ref identity) if identity.id == "6f1c"),
            "expected ConfirmationPending, got {signed_up:?}"
        );
        assert_eq!(store.get(AUTH_TOKEN_KEY).await?, None, "no tokens without confirmation");

        Ok(())
    }

    #[tokio::test]
    async fn sign_up_with_session_persists_tokens() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_json("issued", "Rahim")))
            .expect(1)
            .mount(&server)
            .await;

        let (store, client) = client(&server).await?;

        let signed_up = client
            .sign_up(&NewAccount {
                name: "Rahim".to_string(),
                email: "rahim@example.com".to_string(),
                phone: "01712345678".to_string(),
                password: Password::new("secret1"),
            })
            .await?;

        assert!(
            matches!(signed_up, SignUp::SignedIn(_)),
            "expected SignedIn, got {signed_up:?}"
        );
        assert!(store.get(AUTH_TOKEN_KEY).await?.is_some(), "tokens should be persisted");

        Ok(())
    }

    #[tokio::test]
    async fn restore_refreshes_expired_token() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "msg": "JWT expired",
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_json("fresh", "Rahim")))
            .expect(1)
            .mount(&server)
            .await;

        let (store, client) = client(&server).await?;

        store
            .set(AUTH_TOKEN_KEY, &session_json("stale", "Rahim").to_string())
            .await?;

        let restored = client.restore().await?;

        assert_eq!(restored.map(|user| user.id), Some("6f1c".to_string()));
        assert_eq!(client.access_token().await?, "fresh");

        Ok(())
    }

    #[tokio::test]
    async fn restore_without_persisted_session_is_signed_out() -> TestResult {
        let server = MockServer::start().await;
        let (_store, client) = client(&server).await?;

        assert_eq!(client.restore().await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn sign_out_clears_local_state_even_when_remote_fails() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_json("access-1", "Rahim")))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (store, client) = client(&server).await?;
        let updates = client.subscribe();

        client
            .sign_in("rahim@example.com", &Password::new("secret1"))
            .await?;

        let result = client.sign_out().await;

        assert!(
            matches!(result, Err(IdentityError::UnexpectedResponse(_))),
            "expected UnexpectedResponse, got {result:?}"
        );
        assert_eq!(store.get(AUTH_TOKEN_KEY).await?, None);
        assert!(updates.borrow().is_none(), "subscribers should see sign-out");

        Ok(())
    }

    #[tokio::test]
    async fn update_user_image_requires_session() -> TestResult {
        let server = MockServer::start().await;
        let (_store, client) = client(&server).await?;

        let result = client.update_user_image("data:image/png;base64,AAAA").await;

        assert!(
            matches!(result, Err(IdentityError::NotSignedIn)),
            "expected NotSignedIn, got {result:?}"
        );

        Ok(())
    }
}
