use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use crate::engine::lifecycle::Transition;
use crate::gateway::{GatewayError, OrderGateway};
use crate::models::OrderStatus;

#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl HttpGateway {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get(&self, path: &str) -> Result<Value, GatewayError> {
        let response = self.authorize(self.http.get(self.url(path))).send().await?;
        read_json(response).await
    }
}

#[async_trait]
impl OrderGateway for HttpGateway {
    async fn list_orders(&self, status: OrderStatus) -> Result<Value, GatewayError> {
        self.get(&format!("/orders/{}", status.segment())).await
    }

    async fn order_details(&self, order_id: &str) -> Result<Value, GatewayError> {
        self.get(&format!("/orders/details/{order_id}")).await
    }

    async fn apply_transition(
        &self,
        order_id: &str,
        transition: &Transition,
    ) -> Result<Value, GatewayError> {
        let mut request = self.authorize(self.http.put(self.url(&transition.path(order_id))));
        if let Some(body) = transition.body() {
            request = request.json(&body);
        }

        let response = request.send().await?;
        read_json(response).await
    }

    async fn list_delivery_types(&self) -> Result<Value, GatewayError> {
        self.get("/delivery-types").await
    }
}

/// Non-2xx becomes [`GatewayError::Status`]; an empty 2xx body is `null`.
async fn read_json(response: Response) -> Result<Value, GatewayError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(GatewayError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let gateway =
            HttpGateway::new("http://localhost:5000/api/v1/", None, Duration::from_secs(5)).unwrap();
        assert_eq!(
            gateway.url("/orders/pending"),
            "http://localhost:5000/api/v1/orders/pending"
        );
    }
}
