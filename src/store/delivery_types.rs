use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;

use crate::gateway::{OrderGateway, envelope};
use crate::models::DeliveryType;

/// Names offered when the backend's delivery-type list is unavailable.
pub const FALLBACK_DELIVERY_TYPES: [&str; 4] = [
    "Standard Delivery",
    "Express Delivery",
    "Next Day Delivery",
    "Same Day Delivery",
];

pub struct DeliveryTypeDirectory {
    gateway: Arc<dyn OrderGateway>,
    types: RwLock<Vec<DeliveryType>>,
}

impl DeliveryTypeDirectory {
    pub fn new(gateway: Arc<dyn OrderGateway>) -> Self {
        Self {
            gateway,
            types: RwLock::new(Vec::new()),
        }
    }

    /// Loads the backend list, falling back to the standard names on any
    /// failure.
    pub async fn fetch(&self) -> Vec<DeliveryType> {
        let loaded = match self.gateway.list_delivery_types().await {
            Ok(body) => envelope::parse_delivery_types(body).map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };

        let types = match loaded {
            Ok(types) => types,
            Err(reason) => {
                warn!(error = %reason, "using fallback delivery types");
                fallback()
            }
        };

        *self.types.write().await = types.clone();
        types
    }

    pub async fn resolve(&self, name: &str) -> Option<String> {
        self.types
            .read()
            .await
            .iter()
            .find(|delivery_type| delivery_type.name.eq_ignore_ascii_case(name.trim()))
            .map(|delivery_type| delivery_type.name.clone())
    }
}

fn fallback() -> Vec<DeliveryType> {
    FALLBACK_DELIVERY_TYPES
        .into_iter()
        .map(DeliveryType::named)
        .collect()
}
