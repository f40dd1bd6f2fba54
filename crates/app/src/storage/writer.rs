//! Write-behind snapshot persistence.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, warn};

use crate::storage::{KeyValueStore, StorageError, encode};

#[derive(Debug)]
enum Command {
    Set { key: &'static str, value: String },
    Remove { key: &'static str },
    Flush(oneshot::Sender<()>),
}

/// Queues whole-collection snapshots and writes them in the background.
///
/// Callers never wait on the store. Writes are applied in the order they
/// were queued, so the last snapshot for a key wins.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    sender: mpsc::UnboundedSender<Command>,
}

impl SnapshotWriter {
    /// Start the background writer for `store`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Command>();

        tokio::spawn(async move {
            while let Some(command) = receiver.recv().await {
                match command {
                    Command::Set { key, value } => {
                        if let Err(err) = store.set(key, &value).await {
                            error!(key, error = %err, "failed to persist snapshot");
                        }
                    }
                    Command::Remove { key } => {
                        if let Err(err) = store.remove(key).await {
                            error!(key, error = %err, "failed to remove snapshot");
                        }
                    }
                    Command::Flush(done) => {
                        _ = done.send(());
                    }
                }
            }
        });

        Self { sender }
    }

    /// Queue `value` as the new snapshot for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized; nothing is queued.
    pub fn save<T: Serialize + ?Sized>(
        &self,
        key: &'static str,
        value: &T,
    ) -> Result<(), StorageError> {
        let value = encode(key, value)?;

        self.send(Command::Set { key, value });

        Ok(())
    }

    /// Queue removal of `key`.
    pub fn remove(&self, key: &'static str) {
        self.send(Command::Remove { key });
    }

    /// Wait until everything queued before this call has been written.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();

        self.send(Command::Flush(done));

        _ = wait.await;
    }

    fn send(&self, command: Command) {
        if self.sender.send(command).is_err() {
            warn!("snapshot writer has stopped; dropping write");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use testresult::TestResult;

    use crate::storage::{MockKeyValueStore, SqliteKeyValueStore};

    use super::*;

    #[derive(Debug, Default)]
    struct RecordingStore {
        writes: Mutex<Vec<(String, Option<String>)>>,
    }

    #[async_trait]
    impl KeyValueStore for RecordingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes
                .lock()
                .expect("writes lock")
                .push((key.to_string(), Some(value.to_string())));

            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.writes
                .lock()
                .expect("writes lock")
                .push((key.to_string(), None));

            Ok(())
        }
    }

    #[tokio::test]
    async fn flush_waits_for_queued_writes() -> TestResult {
        let store = Arc::new(SqliteKeyValueStore::in_memory().await?);
        let writer = SnapshotWriter::spawn(store.clone());

        writer.save("cart", &[1, 2, 3])?;
        writer.flush().await;

        assert_eq!(store.get("cart").await?.as_deref(), Some("[1,2,3]"));

        Ok(())
    }

    #[tokio::test]
    async fn writes_apply_in_queue_order() -> TestResult {
        let store = Arc::new(RecordingStore::default());
        let writer = SnapshotWriter::spawn(store.clone());

        writer.save("cart", &[1])?;
        writer.save("orders", &[2])?;
        writer.remove("cart");
        writer.save("cart", &[3])?;
        writer.flush().await;

        let writes = store.writes.lock().expect("writes lock").clone();

        assert_eq!(
            writes,
            vec![
                ("cart".to_string(), Some("[1]".to_string())),
                ("orders".to_string(), Some("[2]".to_string())),
                ("cart".to_string(), None),
                ("cart".to_string(), Some("[3]".to_string())),
            ]
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_write_does_not_stop_the_worker() -> TestResult {
        let mut store = MockKeyValueStore::new();

        store
            .expect_set()
            .withf(|key, _| key == "cart")
            .returning(|_, _| Err(StorageError::Sql(sqlx::Error::PoolClosed)));

        store
            .expect_set()
            .withf(|key, _| key == "orders")
            .times(1)
            .returning(|_, _| Ok(()));

        let writer = SnapshotWriter::spawn(Arc::new(store));

        writer.save("cart", &[1])?;
        writer.save("orders", &[2])?;
        writer.flush().await;

        Ok(())
    }
}
