//! Notifications
//!
//! Order events are published onto an [`Outbox`] and delivered to a
//! [`Notifier`] by a background worker, so delivery failures never reach
//! the operation that raised the event.

mod errors;
mod notifier;
mod outbox;
mod webhook;

pub use errors::NotifierError;
pub use notifier::*;
pub use outbox::Outbox;
pub use webhook::WebhookNotifier;
