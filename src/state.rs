use std::sync::Arc;

use crate::config::Config;
use crate::engine::TransitionCoordinator;
use crate::error::AppError;
use crate::gateway::{HttpGateway, OrderGateway};
use crate::observability::Metrics;
use crate::store::{DeliveryTypeDirectory, OrderStore};

pub struct AppState {
    pub store: Arc<OrderStore>,
    pub coordinator: TransitionCoordinator,
    pub delivery_types: DeliveryTypeDirectory,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let gateway = HttpGateway::new(
            config.backend_url.clone(),
            config.token.clone(),
            config.request_timeout,
        )?;

        Self::with_gateway(Arc::new(gateway))
    }

    pub fn with_gateway(gateway: Arc<dyn OrderGateway>) -> Result<Self, AppError> {
        let metrics = Metrics::new()
            .map_err(|err| AppError::Internal(format!("failed to register metrics: {err}")))?;

        let store = Arc::new(OrderStore::new(gateway.clone(), metrics.clone()));
        let coordinator = TransitionCoordinator::new(gateway.clone(), store.clone(), metrics.clone());
        let delivery_types = DeliveryTypeDirectory::new(gateway);

        Ok(Self {
            store,
            coordinator,
            delivery_types,
            metrics,
        })
    }
}
