//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use platter::{
    cart::{Cart, CartLine},
    products::Product,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    domain::carts::errors::CartsServiceError,
    storage::{self, CART_KEY, KeyValueStore, SnapshotWriter},
};

/// Cart held in memory and persisted as a whole after every change.
#[derive(Debug)]
pub struct StoredCartsService {
    cart: RwLock<Cart>,
    writer: SnapshotWriter,
}

impl StoredCartsService {
    #[must_use]
    pub fn new(cart: Cart, writer: SnapshotWriter) -> Self {
        Self {
            cart: RwLock::new(cart),
            writer,
        }
    }

    /// Rehydrate from the persisted cart, starting empty if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the stored cart is corrupt.
    pub async fn load(
        store: &dyn KeyValueStore,
        writer: SnapshotWriter,
    ) -> Result<Self, CartsServiceError> {
        let lines: Vec<CartLine> = storage::load(store, CART_KEY).await?.unwrap_or_default();

        debug!(lines = lines.len(), "loaded cart");

        Ok(Self::new(Cart::from_lines(lines), writer))
    }

    async fn mutate(&self, change: impl FnOnce(&mut Cart)) -> Result<Cart, CartsServiceError> {
        let mut cart = self.cart.write().await;

        change(&mut cart);

        self.writer.save(CART_KEY, cart.lines())?;

        Ok(cart.clone())
    }
}

#[async_trait]
impl CartsService for StoredCartsService {
    async fn get_cart(&self) -> Cart {
        self.cart.read().await.clone()
    }

    async fn add_to_cart(
        &self,
        product: Product,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        debug!(product_id = %product.id, quantity, "adding to cart");

        self.mutate(|cart| cart.add(product, quantity)).await
    }

    async fn remove_from_cart(&self, product_id: &str) -> Result<Cart, CartsServiceError> {
        self.mutate(|cart| {
            cart.remove(product_id);
        })
        .await
    }

    async fn update_quantity(
        &self,
        product_id: &str,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError> {
        self.mutate(|cart| {
            cart.set_quantity(product_id, quantity);
        })
        .await
    }

    async fn clear_cart(&self) -> Result<Cart, CartsServiceError> {
        self.mutate(Cart::clear).await
    }

    async fn total(&self) -> u64 {
        self.cart.read().await.total()
    }

    async fn item_count(&self) -> u64 {
        self.cart.read().await.item_count()
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Current cart contents.
    async fn get_cart(&self) -> Cart;

    /// Add `quantity` of `product`, merging with an existing line.
    async fn add_to_cart(&self, product: Product, quantity: u32)
    -> Result<Cart, CartsServiceError>;

    /// Remove the line for `product_id`. Missing lines are ignored.
    async fn remove_from_cart(&self, product_id: &str) -> Result<Cart, CartsServiceError>;

    /// Set a line's quantity; zero or less removes the line.
    async fn update_quantity(
        &self,
        product_id: &str,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError>;

    /// Empty the cart.
    async fn clear_cart(&self) -> Result<Cart, CartsServiceError>;

    /// Sum of price times quantity.
    async fn total(&self) -> u64;

    /// Sum of quantities.
    async fn item_count(&self) -> u64;
}
