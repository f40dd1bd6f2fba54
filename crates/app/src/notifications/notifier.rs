//! Notification delivery.

use async_trait::async_trait;
use mockall::automock;
use platter::notifications::Notification;
use tracing::info;

use crate::notifications::NotifierError;

/// Writes notifications to the log. Used when no push transport is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), NotifierError> {
        info!(
            order_id = %notification.data.order_id(),
            title = %notification.title,
            body = %notification.body,
            "notification"
        );

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show `notification` to the customer.
    async fn notify(&self, notification: Notification) -> Result<(), NotifierError>;
}
