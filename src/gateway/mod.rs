pub mod envelope;
pub mod http;

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;
use thiserror::Error;

use crate::engine::lifecycle::Transition;
use crate::models::OrderStatus;

pub use http::HttpGateway;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[automock]
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn list_orders(&self, status: OrderStatus) -> Result<Value, GatewayError>;

    async fn order_details(&self, order_id: &str) -> Result<Value, GatewayError>;

    /// `PUT` the transition's endpoint, with its body if it has one.
    async fn apply_transition(
        &self,
        order_id: &str,
        transition: &Transition,
    ) -> Result<Value, GatewayError>;

    async fn list_delivery_types(&self) -> Result<Value, GatewayError>;
}
