use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::{Barrier, watch};

use crate::engine::lifecycle::Transition;
use crate::gateway::{GatewayError, OrderGateway};
use crate::models::OrderStatus;

pub fn order_json(id: &str, first_name: &str, last_name: &str) -> Value {
    json!({
        "_id": id,
        "customer_details": {
            "first_name": first_name,
            "last_name": last_name,
            "email": format!("{}@example.com", first_name.to_lowercase()),
            "phone": "+971501234567",
            "address": "Downtown",
            "city": "Dubai"
        },
        "order_items": [{ "product_id": "P101", "quantity": 2, "size": "L", "price": 5.0 }],
        "subtotal": 10.0,
        "payment_method": "COD",
        "created_at": "2024-03-15T10:00:00Z"
    })
}

fn empty_list(status: OrderStatus) -> Value {
    match status {
        OrderStatus::Pending => json!({ "data": [] }),
        _ => json!({ "success": true, "data": [] }),
    }
}

pub struct ScriptedGateway {
    calls: Mutex<Vec<String>>,
    lists: HashMap<OrderStatus, Value>,
    failing: HashSet<OrderStatus>,
    list_barrier: Option<Arc<Barrier>>,
    gate: Option<watch::Sender<bool>>,
    gate_transitions: bool,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            lists: HashMap::new(),
            failing: HashSet::new(),
            list_barrier: None,
            gate: None,
            gate_transitions: false,
        }
    }

    pub fn with_list(mut self, status: OrderStatus, body: Value) -> Self {
        self.lists.insert(status, body);
        self
    }

    pub fn failing_list(mut self, status: OrderStatus) -> Self {
        self.failing.insert(status);
        self
    }

    pub fn with_list_barrier(mut self, parties: usize) -> Self {
        self.list_barrier = Some(Arc::new(Barrier::new(parties)));
        self
    }

    /// List calls wait for [`ScriptedGateway::release`].
    pub fn gated(mut self) -> Self {
        self.gate = Some(watch::channel(false).0);
        self
    }

    /// Transition calls wait for [`ScriptedGateway::release`].
    pub fn gated_transitions(mut self) -> Self {
        self.gate = Some(watch::channel(false).0);
        self.gate_transitions = true;
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.send_replace(true);
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub async fn wait_for_calls(&self, count: usize) {
        for _ in 0..200 {
            if self.calls.lock().unwrap().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("gateway never saw {count} calls: {:?}", self.calls());
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            let mut open = gate.subscribe();
            let _ = open.wait_for(|open| *open).await;
        }
    }
}

#[async_trait]
impl OrderGateway for ScriptedGateway {
    async fn list_orders(&self, status: OrderStatus) -> Result<Value, GatewayError> {
        self.record(format!("GET /orders/{}", status.segment()));

        if let Some(barrier) = &self.list_barrier {
            barrier.wait().await;
        }
        if !self.gate_transitions {
            self.wait_for_gate().await;
        }

        if self.failing.contains(&status) {
            return Err(GatewayError::Status {
                status: 500,
                body: "scripted failure".into(),
            });
        }

        Ok(self
            .lists
            .get(&status)
            .cloned()
            .unwrap_or_else(|| empty_list(status)))
    }

    async fn order_details(&self, order_id: &str) -> Result<Value, GatewayError> {
        self.record(format!("GET /orders/details/{order_id}"));
        Ok(json!({ "success": true, "data": order_json(order_id, "Scripted", "Customer") }))
    }

    async fn apply_transition(
        &self,
        order_id: &str,
        transition: &Transition,
    ) -> Result<Value, GatewayError> {
        let path = transition.path(order_id);
        self.record(format!("PUT {path}"));

        if self.gate_transitions {
            self.wait_for_gate().await;
        }

        self.record(format!("PUT {path} done"));
        Ok(json!({ "success": true }))
    }

    async fn list_delivery_types(&self) -> Result<Value, GatewayError> {
        self.record("GET /delivery-types".to_string());
        Ok(json!([]))
    }
}
