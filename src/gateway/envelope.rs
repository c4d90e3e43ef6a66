use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::models::{DeliveryType, Order, OrderStatus};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized {endpoint} envelope: {shape}")]
pub struct MalformedEnvelope {
    pub endpoint: &'static str,
    pub shape: &'static str,
}

impl MalformedEnvelope {
    fn new(endpoint: &'static str, body: &Value) -> Self {
        Self {
            endpoint,
            shape: shape_of(body),
        }
    }
}

pub fn parse_order_list(status: OrderStatus, body: Value) -> Result<Vec<Order>, MalformedEnvelope> {
    let entries = match status {
        OrderStatus::Pending => pending_entries(body),
        OrderStatus::Confirmed => confirmed_entries(body),
        OrderStatus::Delivered => delivered_entries(body),
        OrderStatus::Cancelled => cancelled_entries(body),
    }?;

    Ok(decode_orders(status, entries))
}

fn pending_entries(body: Value) -> Result<Vec<Value>, MalformedEnvelope> {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(entries)) => Ok(entries),
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(other) => Err(MalformedEnvelope::new("pending", &other)),
        },
        other => Err(MalformedEnvelope::new("pending", &other)),
    }
}

fn confirmed_entries(body: Value) -> Result<Vec<Value>, MalformedEnvelope> {
    match success_array(body) {
        Ok(entries) => Ok(entries),
        Err(body) => Err(MalformedEnvelope::new("confirmed", &body)),
    }
}

// The delivered endpoint has also been seen returning a bare array, `{data: {..}}`
// and a bare order object.
fn delivered_entries(body: Value) -> Result<Vec<Value>, MalformedEnvelope> {
    let body = match success_array(body) {
        Ok(entries) => return Ok(entries),
        Err(body) => body,
    };

    match body {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(entries)) => Ok(entries),
            Some(single @ Value::Object(_)) => Ok(vec![single]),
            Some(other) => Err(MalformedEnvelope::new("delivered", &other)),
            None if looks_like_order(&map) => Ok(vec![Value::Object(map)]),
            None => Err(MalformedEnvelope::new("delivered", &Value::Object(map))),
        },
        other => Err(MalformedEnvelope::new("delivered", &other)),
    }
}

fn cancelled_entries(body: Value) -> Result<Vec<Value>, MalformedEnvelope> {
    match success_array(body) {
        Ok(entries) => Ok(entries),
        Err(Value::Array(entries)) => Ok(entries),
        Err(body) => Err(MalformedEnvelope::new("cancelled", &body)),
    }
}

fn success_array(body: Value) -> Result<Vec<Value>, Value> {
    let matches = body.get("success").and_then(Value::as_bool) == Some(true)
        && body.get("data").is_some_and(Value::is_array);

    if !matches {
        return Err(body);
    }

    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(entries)) => Ok(entries),
            _ => Ok(Vec::new()),
        },
        _ => Ok(Vec::new()),
    }
}

fn looks_like_order(map: &Map<String, Value>) -> bool {
    map.contains_key("_id") || map.contains_key("id")
}

fn decode_orders(status: OrderStatus, entries: Vec<Value>) -> Vec<Order> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Order>(entry) {
            Ok(order) => Some(order),
            Err(err) => {
                warn!(status = %status, index, error = %err, "dropping undecodable order");
                None
            }
        })
        .collect()
}

pub fn parse_order_details(body: Value) -> Option<Order> {
    if body.get("success").and_then(Value::as_bool) != Some(true) {
        return None;
    }

    let mut data = body.get("data")?.clone();
    if let Some(inner) = data.get("data").filter(|inner| inner.is_object()) {
        data = inner.clone();
    }

    match serde_json::from_value(data) {
        Ok(order) => Some(order),
        Err(err) => {
            warn!(error = %err, "order details did not decode");
            None
        }
    }
}

pub fn parse_delivery_types(body: Value) -> Result<Vec<DeliveryType>, MalformedEnvelope> {
    let entries = match body {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(MalformedEnvelope::new("delivery-types", &Value::Object(map))),
        },
        other => return Err(MalformedEnvelope::new("delivery-types", &other)),
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
