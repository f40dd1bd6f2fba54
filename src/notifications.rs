//! Order notifications

use serde::{Deserialize, Serialize};

use crate::orders::{OrderId, OrderStatus};

/// Something that happened to an order and is worth telling the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OrderEvent {
    /// A new order was created at checkout.
    #[serde(rename = "order_placed", rename_all = "camelCase")]
    Placed {
        /// New order
        order_id: OrderId,
    },

    /// An order entered a new status.
    #[serde(rename = "status_update", rename_all = "camelCase")]
    StatusChanged {
        /// Updated order
        order_id: OrderId,

        /// Status entered
        status: OrderStatus,
    },
}

impl OrderEvent {
    /// The order this event is about.
    pub fn order_id(&self) -> &OrderId {
        match self {
            Self::Placed { order_id } | Self::StatusChanged { order_id, .. } => order_id,
        }
    }
}

/// A title/body pair shown to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Short headline
    pub title: String,

    /// Message text
    pub body: String,

    /// Machine-readable payload
    pub data: OrderEvent,
}

impl Notification {
    /// Message for `event`.
    #[must_use]
    pub fn for_event(event: &OrderEvent) -> Self {
        let (title, body) = match event {
            OrderEvent::Placed { order_id } => (
                "Order Placed Successfully!",
                format!("Your order {order_id} has been received and is being prepared."),
            ),
            OrderEvent::StatusChanged { order_id, status } => match status {
                OrderStatus::Received => (
                    "Order Received",
                    format!("Order {order_id} has been received."),
                ),
                OrderStatus::Preparing => (
                    "Preparing Your Food",
                    format!("Your order {order_id} is now being prepared with care."),
                ),
                OrderStatus::OnTheWay => (
                    "On the Way!",
                    format!("Your order {order_id} is on the way to you!"),
                ),
                OrderStatus::Delivered => (
                    "Delivered",
                    format!("Your order {order_id} has been delivered. Enjoy your meal!"),
                ),
                OrderStatus::Cancelled => (
                    "Order Cancelled",
                    format!("Your order {order_id} has been cancelled."),
                ),
            },
        };

        Self {
            title: title.to_string(),
            body,
            data: event.clone(),
        }
    }
}
