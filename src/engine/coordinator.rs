use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::engine::in_flight::InFlight;
use crate::engine::lifecycle::{Transition, TransitionKind};
use crate::gateway::{GatewayError, OrderGateway};
use crate::observability::Metrics;
use crate::store::OrderStore;

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("{transition} failed for order {order_id}: {source}")]
    Gateway {
        order_id: String,
        transition: TransitionKind,
        #[source]
        source: GatewayError,
    },

    #[error("order {order_id} already has a {running} in flight")]
    InFlight {
        order_id: String,
        running: TransitionKind,
    },
}

pub struct TransitionCoordinator {
    gateway: Arc<dyn OrderGateway>,
    store: Arc<OrderStore>,
    in_flight: InFlight,
    metrics: Metrics,
}

impl TransitionCoordinator {
    pub fn new(gateway: Arc<dyn OrderGateway>, store: Arc<OrderStore>, metrics: Metrics) -> Self {
        Self {
            gateway,
            store,
            in_flight: InFlight::default(),
            metrics,
        }
    }

    pub async fn confirm(&self, order_id: &str) -> Result<(), TransitionError> {
        self.apply(order_id, Transition::Confirm).await.map(drop)
    }

    pub async fn cancel(&self, order_id: &str) -> Result<(), TransitionError> {
        self.apply(order_id, Transition::Cancel).await.map(drop)
    }

    pub async fn deliver(&self, order_id: &str) -> Result<(), TransitionError> {
        self.apply(order_id, Transition::Deliver).await.map(drop)
    }

    pub async fn revoke_delivered(&self, order_id: &str) -> Result<(), TransitionError> {
        self.apply(order_id, Transition::RevokeDelivered)
            .await
            .map(drop)
    }

    /// Returns the backend's response body.
    pub async fn assign_delivery_type(
        &self,
        order_id: &str,
        delivery_type_name: &str,
    ) -> Result<Value, TransitionError> {
        self.apply(
            order_id,
            Transition::AssignDeliveryType {
                delivery_type_name: delivery_type_name.to_string(),
            },
        )
        .await
    }

    pub fn in_flight(&self, order_id: &str) -> Option<TransitionKind> {
        self.in_flight.running(order_id)
    }

    // A failed PUT returns before any refresh, so collections are never
    // touched on error.
    pub async fn apply(
        &self,
        order_id: &str,
        transition: Transition,
    ) -> Result<Value, TransitionError> {
        let kind = transition.kind();

        let _claim = self.in_flight.claim(order_id, kind).map_err(|running| {
            warn!(order_id = %order_id, transition = %kind, running = %running, "transition already in flight");
            self.record(kind, "rejected");
            TransitionError::InFlight {
                order_id: order_id.to_string(),
                running,
            }
        })?;

        let start = Instant::now();

        let response = match self.gateway.apply_transition(order_id, &transition).await {
            Ok(response) => response,
            Err(source) => {
                error!(order_id = %order_id, transition = %kind, error = %source, "transition failed");
                self.record(kind, "error");
                self.observe(kind, start);
                return Err(TransitionError::Gateway {
                    order_id: order_id.to_string(),
                    transition: kind,
                    source,
                });
            }
        };

        self.store.refresh(transition.refreshes()).await;

        self.record(kind, "ok");
        self.observe(kind, start);
        info!(order_id = %order_id, transition = %kind, "transition applied");

        Ok(response)
    }

    fn record(&self, kind: TransitionKind, outcome: &str) {
        self.metrics
            .order_transitions_total
            .with_label_values(&[kind.as_str(), outcome])
            .inc();
    }

    fn observe(&self, kind: TransitionKind, start: Instant) {
        self.metrics
            .order_transition_latency_seconds
            .with_label_values(&[kind.as_str()])
            .observe(start.elapsed().as_secs_f64());
    }
}
