//! Order event outbox.

use std::sync::Arc;

use platter::notifications::{Notification, OrderEvent};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::notifications::Notifier;

#[derive(Debug)]
enum Message {
    Event(OrderEvent),
    Flush(oneshot::Sender<()>),
}

/// Publishing side of the order event queue.
#[derive(Debug, Clone)]
pub struct Outbox {
    sender: mpsc::UnboundedSender<Message>,
}

impl Outbox {
    /// Start a worker that turns each published event into a notification
    /// for `notifier`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(notifier: Arc<dyn Notifier>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Message>();

        tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                match message {
                    Message::Event(event) => {
                        let order_id = event.order_id().clone();

                        if let Err(err) = notifier.notify(Notification::for_event(&event)).await {
                            warn!(%order_id, error = %err, "failed to deliver notification");
                        }
                    }
                    Message::Flush(done) => {
                        _ = done.send(());
                    }
                }
            }
        });

        Self { sender }
    }

    /// Queue `event` for delivery.
    pub fn publish(&self, event: OrderEvent) {
        debug!(?event, "publishing order event");

        if self.sender.send(Message::Event(event)).is_err() {
            warn!("notification worker has stopped; dropping event");
        }
    }

    /// Wait until every event published before this call has been handled.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();

        if self.sender.send(Message::Flush(done)).is_ok() {
            _ = wait.await;
        }
    }
}
