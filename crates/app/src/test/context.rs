//! Test context for service-level tests.

use std::sync::Arc;

use platter::{cart::Cart, orders::TransitionPolicy};

use crate::{
    domain::{carts::StoredCartsService, orders::StoredOrdersService},
    notifications::Outbox,
    storage::{SnapshotWriter, SqliteKeyValueStore, StorageError},
    test::RecordingNotifier,
};

/// Services wired to a private in-memory database.
pub(crate) struct TestContext {
    pub store: Arc<SqliteKeyValueStore>,
    pub writer: SnapshotWriter,
    pub notifier: Arc<RecordingNotifier>,
    pub outbox: Outbox,
    pub carts: Arc<StoredCartsService>,
    pub orders: Arc<StoredOrdersService>,
}

impl TestContext {
    pub(crate) async fn new() -> Result<Self, StorageError> {
        let store = Arc::new(SqliteKeyValueStore::in_memory().await?);
        let writer = SnapshotWriter::spawn(store.clone());
        let notifier = Arc::new(RecordingNotifier::default());
        let outbox = Outbox::spawn(notifier.clone());

        Ok(Self {
            carts: Arc::new(StoredCartsService::new(Cart::new(), writer.clone())),
            orders: Arc::new(StoredOrdersService::new(
                Vec::new(),
                TransitionPolicy::Permissive,
                writer.clone(),
                outbox.clone(),
            )),
            store,
            writer,
            notifier,
            outbox,
        })
    }

    /// Wait for queued snapshots and notifications.
    pub(crate) async fn flush(&self) {
        self.writer.flush().await;
        self.outbox.flush().await;
    }
}
