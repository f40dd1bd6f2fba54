//! Orders
//!
//! An [`Order`] is an immutable snapshot of a checked-out cart plus a status
//! that moves through [`OrderStatus`] and an append-only [`StatusChange`]
//! history.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{cart::CartLine, ids::TypedId, pricing};

mod payment;
mod status;

pub use payment::{ParsePaymentMethodError, PaymentMethod};
pub use status::{OrderStatus, ParseStatusError, TransitionError, TransitionPolicy};

/// Order Id
pub type OrderId = TypedId<Order>;

/// One entry in an order's status trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Status entered
    pub status: OrderStatus,

    /// When it was entered
    pub timestamp: Timestamp,
}

/// Checkout details handed to order creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Cart lines, copied into the order
    pub items: Vec<CartLine>,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Free-text delivery address
    pub delivery_address: String,

    /// Contact phone
    pub customer_phone: String,

    /// Contact name
    pub customer_name: String,

    /// Wallet transaction id; absent for cash
    pub transaction_id: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order id
    pub id: OrderId,

    /// Lines as they were at checkout
    pub items: Vec<CartLine>,

    /// Item subtotal frozen at creation; excludes the delivery fee
    pub total_amount: u64,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Wallet transaction id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    /// Current status
    pub status: OrderStatus,

    /// Checkout time
    pub created_at: Timestamp,

    /// Delivery address
    pub delivery_address: String,

    /// Contact phone
    pub customer_phone: String,

    /// Contact name
    pub customer_name: String,

    /// Every status entered, oldest first
    pub status_history: Vec<StatusChange>,
}

impl Order {
    /// Build a freshly received order from checkout details.
    #[must_use]
    pub fn place(id: OrderId, new: NewOrder, created_at: Timestamp) -> Self {
        let total_amount = pricing::subtotal(&new.items);

        Self {
            id,
            items: new.items,
            total_amount,
            payment_method: new.payment_method,
            transaction_id: new.transaction_id,
            status: OrderStatus::Received,
            created_at,
            delivery_address: new.delivery_address,
            customer_phone: new.customer_phone,
            customer_name: new.customer_name,
            status_history: vec![StatusChange {
                status: OrderStatus::Received,
                timestamp: created_at,
            }],
        }
    }

    /// Move to `status` and append it to the history.
    ///
    /// `at` is clamped to the last history timestamp so the trail stays
    /// ordered even if the clock steps backwards.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] if `policy` forbids the change; the
    /// order is left untouched.
    pub fn transition(
        &mut self,
        status: OrderStatus,
        at: Timestamp,
        policy: TransitionPolicy,
    ) -> Result<StatusChange, TransitionError> {
        policy.check(self.status, status)?;

        let timestamp = self
            .status_history
            .last()
            .map_or(at, |last| at.max(last.timestamp));

        let change = StatusChange { status, timestamp };

        self.status = status;
        self.status_history.push(change);

        Ok(change)
    }

    /// When `status` was first entered, if ever.
    pub fn entered_at(&self, status: OrderStatus) -> Option<Timestamp> {
        self.status_history
            .iter()
            .find(|change| change.status == status)
            .map(|change| change.timestamp)
    }

    /// Each delivery step paired with when the order first reached it.
    pub fn progress(&self) -> [(OrderStatus, Option<Timestamp>); 4] {
        OrderStatus::STEPS.map(|step| (step, self.entered_at(step)))
    }

    /// Subtotal plus the delivery fee.
    #[must_use]
    pub fn grand_total(&self) -> u64 {
        pricing::grand_total(self.total_amount)
    }
}

/// Produces `ORD-<unix millis>` ids that never repeat within a process.
#[derive(Debug, Clone, Default)]
pub struct OrderIdGenerator {
    last: i64,
}

impl OrderIdGenerator {
    /// Start a generator that will not issue ids at or below `last`.
    #[must_use]
    pub fn resume_after(last: i64) -> Self {
        Self { last }
    }

    /// Seed from existing order ids so reloaded collections keep unique ids.
    #[must_use]
    pub fn from_orders<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        let last = orders
            .into_iter()
            .filter_map(|order| Self::millis_of(&order.id))
            .max()
            .unwrap_or_default();

        Self::resume_after(last)
    }

    /// Id for an order created at `now`.
    pub fn next(&mut self, now: Timestamp) -> OrderId {
        let millis = now.as_millisecond().max(self.last.saturating_add(1));

        self.last = millis;

        OrderId::new(format!("ORD-{millis}"))
    }

    fn millis_of(id: &OrderId) -> Option<i64> {
        id.as_str().strip_prefix("ORD-")?.parse().ok()
    }
}
