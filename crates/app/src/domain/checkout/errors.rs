//! Checkout errors.

use platter::validation::ValidationError;
use thiserror::Error;

use crate::domain::{carts::CartsServiceError, orders::OrdersServiceError};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("your cart is empty")]
    EmptyCart,

    #[error("please sign in to place an order")]
    NotSignedIn,

    #[error("failed to update cart")]
    Cart(#[from] CartsServiceError),

    #[error("failed to create order")]
    Order(#[from] OrdersServiceError),
}
