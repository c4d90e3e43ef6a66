pub mod delivery_types;
mod loading;

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use dashmap::DashMap;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::gateway::{OrderGateway, envelope};
use crate::models::{Order, OrderStatus};
use crate::observability::Metrics;

pub use delivery_types::DeliveryTypeDirectory;
use loading::LoadingGuard;

/// One collection per status, each replaced wholesale by its own fetch. A
/// failed fetch leaves its collection empty. Concurrent fetches of the same
/// status are not serialized; the last reply wins.
pub struct OrderStore {
    gateway: Arc<dyn OrderGateway>,
    collections: DashMap<OrderStatus, Vec<Order>>,
    loading: AtomicUsize,
    metrics: Metrics,
}

impl OrderStore {
    pub fn new(gateway: Arc<dyn OrderGateway>, metrics: Metrics) -> Self {
        let collections = OrderStatus::ALL
            .into_iter()
            .map(|status| (status, Vec::new()))
            .collect();

        Self {
            gateway,
            collections,
            loading: AtomicUsize::new(0),
            metrics,
        }
    }

    pub async fn fetch_pending(&self) {
        self.fetch(OrderStatus::Pending).await;
    }

    pub async fn fetch_confirmed(&self) {
        self.fetch(OrderStatus::Confirmed).await;
    }

    pub async fn fetch_delivered(&self) {
        self.fetch(OrderStatus::Delivered).await;
    }

    pub async fn fetch_cancelled(&self) {
        self.fetch(OrderStatus::Cancelled).await;
    }

    pub async fn fetch(&self, status: OrderStatus) {
        let _loading = LoadingGuard::acquire(&self.loading);

        let orders = match self.gateway.list_orders(status).await {
            Ok(body) => match envelope::parse_order_list(status, body) {
                Ok(orders) => {
                    self.record_fetch(status, "ok");
                    orders
                }
                Err(err) => {
                    warn!(status = %status, error = %err, "malformed order list response");
                    self.record_fetch(status, "malformed");
                    Vec::new()
                }
            },
            Err(err) => {
                warn!(status = %status, error = %err, "failed to fetch orders");
                self.record_fetch(status, "error");
                Vec::new()
            }
        };

        self.replace(status, orders);
    }

    pub async fn refresh(&self, statuses: &[OrderStatus]) {
        join_all(statuses.iter().map(|status| self.fetch(*status))).await;
    }

    pub async fn order_details(&self, order_id: &str) -> Option<Order> {
        match self.gateway.order_details(order_id).await {
            Ok(body) => envelope::parse_order_details(body),
            Err(err) => {
                warn!(order_id = %order_id, error = %err, "failed to fetch order details");
                None
            }
        }
    }

    pub fn orders(&self, status: OrderStatus) -> Vec<Order> {
        self.collections
            .get(&status)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub fn pending(&self) -> Vec<Order> {
        self.orders(OrderStatus::Pending)
    }

    pub fn confirmed(&self) -> Vec<Order> {
        self.orders(OrderStatus::Confirmed)
    }

    pub fn delivered(&self) -> Vec<Order> {
        self.orders(OrderStatus::Delivered)
    }

    pub fn cancelled(&self) -> Vec<Order> {
        self.orders(OrderStatus::Cancelled)
    }

    pub fn find(&self, status: OrderStatus, order_id: &str) -> Option<Order> {
        self.collections.get(&status).and_then(|entry| {
            entry
                .value()
                .iter()
                .find(|order| order.id == order_id)
                .cloned()
        })
    }

    pub fn is_loading(&self) -> bool {
        loading::is_held(&self.loading)
    }

    fn replace(&self, status: OrderStatus, orders: Vec<Order>) {
        let len = orders.len();
        self.collections.insert(status, orders);

        self.metrics
            .order_collection_size
            .with_label_values(&[status.segment()])
            .set(i64::try_from(len).unwrap_or(i64::MAX));

        debug!(status = %status, len, "collection replaced");
    }

    fn record_fetch(&self, status: OrderStatus, outcome: &str) {
        self.metrics
            .order_fetches_total
            .with_label_values(&[status.segment(), outcome])
            .inc();
    }
}
