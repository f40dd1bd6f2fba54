//! App Context

use std::sync::Arc;

use platter::{
    catalog::{Catalog, CatalogError},
    orders::TransitionPolicy,
};
use thiserror::Error;

use crate::{
    auth::{
        IdentityProvider, SessionError, SessionService, SessionStore, SupabaseClient,
        SupabaseConfig,
    },
    config::AppConfig,
    domain::{
        carts::{CartsService, CartsServiceError, StoredCartsService},
        checkout::{CartCheckoutService, CheckoutService},
        orders::{OrdersService, OrdersServiceError, StoredOrdersService},
    },
    notifications::{LogNotifier, Notifier, Outbox, WebhookNotifier},
    storage::{KeyValueStore, SnapshotWriter, SqliteKeyValueStore, StorageError},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to open database")]
    Database(#[source] StorageError),

    #[error("failed to load menu")]
    Catalog(#[from] CatalogError),

    #[error("failed to load cart")]
    Carts(#[from] CartsServiceError),

    #[error("failed to load orders")]
    Orders(#[from] OrdersServiceError),

    #[error("failed to restore session")]
    Session(#[from] SessionError),
}

/// Behaviour switches for [`AppContext::build`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AppOptions {
    pub transitions: TransitionPolicy,
    pub allow_guest_checkout: bool,
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<Catalog>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub sessions: Arc<dyn SessionService>,
    pub checkout: Arc<dyn CheckoutService>,
    writer: SnapshotWriter,
    outbox: Outbox,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the database cannot be opened or persisted
    /// state cannot be loaded.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(
            SqliteKeyValueStore::connect(&config.database_url)
                .await
                .map_err(AppInitError::Database)?,
        );

        let provider = Arc::new(SupabaseClient::new(
            SupabaseConfig {
                url: config.supabase_url.clone(),
                anon_key: config.supabase_anon_key.clone(),
            },
            store.clone(),
        ));

        let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
            Some(url) => Arc::new(WebhookNotifier::new(
                url.clone(),
                config.notify_webhook_token.clone(),
            )),
            None => Arc::new(LogNotifier),
        };

        Self::build(
            store,
            provider,
            notifier,
            AppOptions {
                transitions: config.order_transitions.into(),
                allow_guest_checkout: config.allow_guest_checkout,
            },
        )
        .await
    }

    /// Wire services over the given adapters and rehydrate persisted state.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error when persisted state cannot be loaded.
    pub async fn build(
        store: Arc<dyn KeyValueStore>,
        provider: Arc<dyn IdentityProvider>,
        notifier: Arc<dyn Notifier>,
        options: AppOptions,
    ) -> Result<Self, AppInitError> {
        let catalog = Arc::new(Catalog::bundled()?);
        let writer = SnapshotWriter::spawn(store.clone());
        let outbox = Outbox::spawn(notifier);

        let carts = Arc::new(StoredCartsService::load(store.as_ref(), writer.clone()).await?);

        let orders = Arc::new(
            StoredOrdersService::load(
                store.as_ref(),
                options.transitions,
                writer.clone(),
                outbox.clone(),
            )
            .await?,
        );

        let sessions = Arc::new(SessionStore::new(provider, writer.clone()));
        sessions.start(store.as_ref()).await?;

        let mut checkout = CartCheckoutService::new(carts.clone(), orders.clone(), sessions.clone());

        if options.allow_guest_checkout {
            checkout = checkout.allow_guests();
        }

        Ok(Self {
            catalog,
            carts,
            orders,
            sessions,
            checkout: Arc::new(checkout),
            writer,
            outbox,
        })
    }

    /// Wait until queued snapshots are written and queued notifications
    /// delivered.
    pub async fn flush(&self) {
        self.writer.flush().await;
        self.outbox.flush().await;
    }
}
