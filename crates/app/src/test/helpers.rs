//! Test Helpers

use std::sync::Mutex;

use async_trait::async_trait;
use platter::{
    notifications::Notification,
    products::{Product, ProductId},
    session::Session,
};

use crate::notifications::{Notifier, NotifierError};

pub(crate) fn product(id: &str, name: &str, price: u64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: format!("{name} description"),
        price,
        image: format!("https://images.example.com/{id}.jpg"),
        category: "Burgers".to_string(),
        ingredients: None,
        preparation_time: None,
        is_popular: None,
    }
}

pub(crate) fn session(id: &str, name: &str) -> Session {
    Session {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{id}@example.com"),
        phone: "01712345678".to_string(),
        image: None,
    }
}

/// Notifier that keeps every notification it is given.
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    delivered: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(crate) fn delivered(&self) -> Vec<Notification> {
        self.delivered
            .lock()
            .expect("notifier lock should not be poisoned")
            .clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), NotifierError> {
        self.delivered
            .lock()
            .expect("notifier lock should not be poisoned")
            .push(notification);

        Ok(())
    }
}
