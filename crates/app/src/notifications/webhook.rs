//! Webhook push transport.

use std::fmt;

use async_trait::async_trait;
use platter::notifications::Notification;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::notifications::{Notifier, NotifierError};

/// Posts each notification as JSON to a push gateway.
#[derive(Clone)]
pub struct WebhookNotifier {
    url: String,
    token: Option<String>,
    http: Client,
}

impl WebhookNotifier {
    #[must_use]
    pub fn new(url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            url: url.into(),
            token,
            http: Client::new(),
        }
    }
}

impl fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookNotifier")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), NotifierError> {
        let mut request = self.http.post(&self.url).json(&notification);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            debug!(order_id = %notification.data.order_id(), "notification pushed");

            return Ok(());
        }

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(NotifierError::PermissionDenied);
        }

        let text = response.text().await.unwrap_or_default();

        Err(NotifierError::Unavailable(format!(
            "push gateway responded with status {status}: {text}"
        )))
    }
}
