//! Checkout service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use platter::{
    orders::{NewOrder, Order},
    validation::CheckoutDetails,
};
use tracing::info;

use crate::{
    auth::SessionService,
    domain::{carts::CartsService, checkout::errors::CheckoutError, orders::OrdersService},
};

/// Turns the current cart into an order.
pub struct CartCheckoutService {
    carts: Arc<dyn CartsService>,
    orders: Arc<dyn OrdersService>,
    sessions: Arc<dyn SessionService>,
    requires_session: bool,
}

impl CartCheckoutService {
    #[must_use]
    pub fn new(
        carts: Arc<dyn CartsService>,
        orders: Arc<dyn OrdersService>,
        sessions: Arc<dyn SessionService>,
    ) -> Self {
        Self {
            carts,
            orders,
            sessions,
            requires_session: true,
        }
    }

    /// Allow checkout without a signed-in session.
    #[must_use]
    pub fn allow_guests(mut self) -> Self {
        self.requires_session = false;
        self
    }
}

impl fmt::Debug for CartCheckoutService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartCheckoutService")
            .field("requires_session", &self.requires_session)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CheckoutService for CartCheckoutService {
    async fn place_order(&self, details: CheckoutDetails) -> Result<Order, CheckoutError> {
        details.validate()?;

        if self.requires_session && !self.sessions.is_authenticated().await {
            return Err(CheckoutError::NotSignedIn);
        }

        let cart = self.carts.get_cart().await;

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let transaction_id = details.transaction_id().map(str::to_string);

        let order = self
            .orders
            .create_order(NewOrder {
                items: cart.snapshot(),
                payment_method: details.payment_method,
                delivery_address: details.delivery_address,
                customer_phone: details.customer_phone,
                customer_name: details.customer_name,
                transaction_id,
            })
            .await?;

        self.carts.clear_cart().await?;

        info!(order_id = %order.id, grand_total = order.grand_total(), "checkout complete");

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Validate `details`, create an order from the cart, and empty the cart.
    async fn place_order(&self, details: CheckoutDetails) -> Result<Order, CheckoutError>;
}
