//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use platter::{
    notifications::OrderEvent,
    orders::{NewOrder, Order, OrderIdGenerator, OrderStatus, TransitionPolicy},
};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{
    domain::orders::errors::OrdersServiceError,
    notifications::Outbox,
    storage::{self, KeyValueStore, ORDERS_KEY, SnapshotWriter},
};

#[derive(Debug)]
struct Orders {
    /// Newest first
    list: Vec<Order>,
    ids: OrderIdGenerator,
}

/// Orders held in memory, persisted as a whole collection, with events
/// published to the notification outbox.
#[derive(Debug)]
pub struct StoredOrdersService {
    orders: RwLock<Orders>,
    policy: TransitionPolicy,
    writer: SnapshotWriter,
    outbox: Outbox,
}

impl StoredOrdersService {
    #[must_use]
    pub fn new(
        orders: Vec<Order>,
        policy: TransitionPolicy,
        writer: SnapshotWriter,
        outbox: Outbox,
    ) -> Self {
        let ids = OrderIdGenerator::from_orders(&orders);

        Self {
            orders: RwLock::new(Orders { list: orders, ids }),
            policy,
            writer,
            outbox,
        }
    }

    /// Rehydrate from the persisted orders collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the stored orders are corrupt.
    pub async fn load(
        store: &dyn KeyValueStore,
        policy: TransitionPolicy,
        writer: SnapshotWriter,
        outbox: Outbox,
    ) -> Result<Self, OrdersServiceError> {
        let orders: Vec<Order> = storage::load(store, ORDERS_KEY).await?.unwrap_or_default();

        debug!(orders = orders.len(), ?policy, "loaded orders");

        Ok(Self::new(orders, policy, writer, outbox))
    }
}

#[async_trait]
impl OrdersService for StoredOrdersService {
    async fn list_orders(&self) -> Vec<Order> {
        self.orders.read().await.list.clone()
    }

    async fn get_order(&self, id: &str) -> Option<Order> {
        self.orders
            .read()
            .await
            .list
            .iter()
            .find(|order| order.id == id)
            .cloned()
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        let mut orders = self.orders.write().await;

        let now = Timestamp::now();
        let id = orders.ids.next(now);
        let order = Order::place(id, order, now);

        orders.list.insert(0, order.clone());

        self.writer.save(ORDERS_KEY, &orders.list)?;

        info!(
            order_id = %order.id,
            total_amount = order.total_amount,
            payment_method = %order.payment_method,
            "order created"
        );

        self.outbox.publish(OrderEvent::Placed {
            order_id: order.id.clone(),
        });

        Ok(order)
    }

    async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<Option<Order>, OrdersServiceError> {
        let mut orders = self.orders.write().await;

        let Some(order) = orders.list.iter_mut().find(|order| order.id == id) else {
            debug!(order_id = id, "status update for unknown order ignored");

            return Ok(None);
        };

        let from = order.status;

        order.transition(status, Timestamp::now(), self.policy)?;

        let updated = order.clone();

        self.writer.save(ORDERS_KEY, &orders.list)?;

        info!(order_id = id, %from, to = %status, "order status updated");

        self.outbox.publish(OrderEvent::StatusChanged {
            order_id: updated.id.clone(),
            status,
        });

        Ok(Some(updated))
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// All orders, newest first.
    async fn list_orders(&self) -> Vec<Order>;

    /// Look up an order by id.
    async fn get_order(&self, id: &str) -> Option<Order>;

    /// Place a new order from checkout details.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError>;

    /// Move an order to `status`. Returns `None` when no order has `id`.
    async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<Option<Order>, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use platter::{cart::CartLine, orders::PaymentMethod};
    use testresult::TestResult;

    use crate::{
        storage::SqliteKeyValueStore,
        test::{RecordingNotifier, product},
    };

    use super::*;

    struct Fixture {
        store: Arc<SqliteKeyValueStore>,
        notifier: Arc<RecordingNotifier>,
        outbox: Outbox,
        orders: StoredOrdersService,
    }

    async fn fixture(policy: TransitionPolicy) -> Result<Fixture, OrdersServiceError> {
        let store = Arc::new(SqliteKeyValueStore::in_memory().await?);
        let notifier = Arc::new(RecordingNotifier::default());
        let outbox = Outbox::spawn(notifier.clone());

        let orders = StoredOrdersService::load(
            store.as_ref(),
            policy,
            SnapshotWriter::spawn(store.clone()),
            outbox.clone(),
        )
        .await?;

        Ok(Fixture {
            store,
            notifier,
            outbox,
            orders,
        })
    }

    fn new_order() -> NewOrder {
        NewOrder {
            items: vec![
                CartLine {
                    product: product("1", "Burger", 250),
                    quantity: 2,
                },
                CartLine {
                    product: product("3", "Fries", 100),
                    quantity: 1,
                },
            ],
            payment_method: PaymentMethod::Cash,
            delivery_address: "House 12, Dhanmondi".to_string(),
            customer_phone: "01712345678".to_string(),
            customer_name: "Rahim".to_string(),
            transaction_id: None,
        }
    }

    #[tokio::test]
    async fn create_order_starts_received() -> TestResult {
        let ctx = fixture(TransitionPolicy::Permissive).await?;

        let order = ctx.orders.create_order(new_order()).await?;

        assert_eq!(order.total_amount, 600);
        assert_eq!(order.status, OrderStatus::Received);
        assert_eq!(order.status_history.len(), 1);
        assert!(order.id.as_str().starts_with("ORD-"));

        Ok(())
    }

    #[tokio::test]
    async fn orders_are_listed_newest_first() -> TestResult {
        let ctx = fixture(TransitionPolicy::Permissive).await?;

        let first = ctx.orders.create_order(new_order()).await?;
        let second = ctx.orders.create_order(new_order()).await?;

        let ids: Vec<_> = ctx
            .orders
            .list_orders()
            .await
            .into_iter()
            .map(|order| order.id)
            .collect();

        assert_eq!(ids, vec![second.id, first.id]);

        Ok(())
    }

    #[tokio::test]
    async fn each_status_update_appends_history() -> TestResult {
        let ctx = fixture(TransitionPolicy::Permissive).await?;
        let order = ctx.orders.create_order(new_order()).await?;

        for status in [
            OrderStatus::Preparing,
            OrderStatus::Preparing,
            OrderStatus::Delivered,
            OrderStatus::Received,
        ] {
            let before = ctx
                .orders
                .get_order(order.id.as_str())
                .await
                .map_or(0, |order| order.status_history.len());

            let updated = ctx
                .orders
                .update_order_status(order.id.as_str(), status)
                .await?
                .ok_or("order should exist")?;

            assert_eq!(updated.status, status);
            assert_eq!(updated.status_history.len(), before + 1);
            assert_eq!(updated.status_history[0].status, OrderStatus::Received);
            assert_eq!(updated.status_history[0].timestamp, order.created_at);
        }

        Ok(())
    }

    #[tokio::test]
    async fn unknown_order_update_changes_nothing() -> TestResult {
        let ctx = fixture(TransitionPolicy::Permissive).await?;
        ctx.orders.create_order(new_order()).await?;

        let before = ctx.orders.list_orders().await;
        let result = ctx
            .orders
            .update_order_status("ORD-0", OrderStatus::Delivered)
            .await?;

        assert!(result.is_none());
        assert_eq!(ctx.orders.list_orders().await, before);

        Ok(())
    }

    #[tokio::test]
    async fn forward_only_rejects_going_backwards() -> TestResult {
        let ctx = fixture(TransitionPolicy::ForwardOnly).await?;
        let order = ctx.orders.create_order(new_order()).await?;

        ctx.orders
            .update_order_status(order.id.as_str(), OrderStatus::Delivered)
            .await?;

        let result = ctx
            .orders
            .update_order_status(order.id.as_str(), OrderStatus::Preparing)
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::InvalidTransition {
                    from: OrderStatus::Delivered,
                    to: OrderStatus::Preparing,
                })
            ),
            "expected InvalidTransition, got {result:?}"
        );

        let stored = ctx
            .orders
            .get_order(order.id.as_str())
            .await
            .ok_or("order should exist")?;

        assert_eq!(stored.status, OrderStatus::Delivered);
        assert_eq!(stored.status_history.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn lifecycle_events_reach_the_notifier() -> TestResult {
        let ctx = fixture(TransitionPolicy::Permissive).await?;
        let order = ctx.orders.create_order(new_order()).await?;

        ctx.orders
            .update_order_status(order.id.as_str(), OrderStatus::OnTheWay)
            .await?;
        ctx.orders
            .update_order_status("ORD-0", OrderStatus::OnTheWay)
            .await?;
        ctx.outbox.flush().await;

        let events: Vec<_> = ctx
            .notifier
            .delivered()
            .into_iter()
            .map(|notification| notification.data)
            .collect();

        assert_eq!(
            events,
            vec![
                OrderEvent::Placed {
                    order_id: order.id.clone(),
                },
                OrderEvent::StatusChanged {
                    order_id: order.id,
                    status: OrderStatus::OnTheWay,
                },
            ]
        );

        Ok(())
    }

    #[tokio::test]
    async fn orders_survive_reload() -> TestResult {
        let ctx = fixture(TransitionPolicy::Permissive).await?;
        let order = ctx.orders.create_order(new_order()).await?;

        ctx.orders
            .update_order_status(order.id.as_str(), OrderStatus::Preparing)
            .await?;
        ctx.orders.writer.flush().await;

        let reloaded = StoredOrdersService::load(
            ctx.store.as_ref(),
            TransitionPolicy::Permissive,
            SnapshotWriter::spawn(ctx.store.clone()),
            ctx.outbox.clone(),
        )
        .await?;

        assert_eq!(reloaded.list_orders().await, ctx.orders.list_orders().await);

        let next = reloaded.create_order(new_order()).await?;

        assert_ne!(next.id, order.id, "reloaded generator must not reuse ids");

        Ok(())
    }
}
