use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Derived from the list endpoint an order came from, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn segment(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.segment().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| format!("unknown order status: {raw}"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CustomerDetails {
    #[serde(deserialize_with = "lenient_text")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub apartment: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub postal_code: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub delivery_city: Option<String>,
}

impl CustomerDetails {
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// List endpoints send a bare product id, detail endpoints the populated
/// document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ProductRef {
    Populated {
        #[serde(rename = "_id", default, deserialize_with = "lenient_text")]
        id: Option<String>,
        #[serde(default, deserialize_with = "lenient_text")]
        title: Option<String>,
        #[serde(default, deserialize_with = "lenient_text")]
        image_url: Option<String>,
    },
    Id(#[serde(deserialize_with = "lenient_id")] String),
}

impl ProductRef {
    pub fn title(&self) -> Option<&str> {
        match self {
            ProductRef::Populated { title, .. } => title.as_deref(),
            ProductRef::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrderItem {
    #[serde(rename = "product_id", deserialize_with = "lenient")]
    pub product: Option<ProductRef>,
    #[serde(deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    #[serde(deserialize_with = "lenient_amount_opt")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub size: Option<String>,
    pub selected_attributes: Option<Value>,
}

/// Only `_id` is required. Every other field is display data and falls back
/// to its default when missing, null or of the wrong type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    #[serde(rename = "_id", alias = "id", deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub customer_details: CustomerDetails,
    #[serde(default, deserialize_with = "lenient_items")]
    pub order_items: Vec<OrderItem>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub subtotal: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub delivery_type_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub order_notes: Option<String>,
    #[serde(default, rename = "status", deserialize_with = "lenient_text")]
    pub reported_status: Option<String>,
}

impl Order {
    pub fn customer_name(&self) -> String {
        self.customer_details.full_name()
    }

    pub fn item_count(&self) -> usize {
        self.order_items.len()
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn scalar_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    number.filter(|number| number.is_finite())
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_text(value).ok_or_else(|| serde::de::Error::custom("id must be a string or number"))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(scalar_text))
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_amount_opt(deserializer)?.unwrap_or_default())
}

fn lenient_amount_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(scalar_number))
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let quantity = lenient_amount_opt(deserializer)?.unwrap_or_default();
    Ok(quantity.max(0.0).round() as u32)
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<OrderItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Accepts RFC 3339 or a bare `YYYY-MM-DD`; anything else becomes `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_backend_order_with_populated_products() {
        let order: Order = serde_json::from_value(json!({
            "_id": "o1",
            "customer_details": {
                "first_name": "John",
                "last_name": "Doe",
                "phone": "+971501234567",
                "city": "Dubai"
            },
            "order_items": [
                { "product_id": { "_id": "p1", "title": "Shirt" }, "quantity": 2, "size": "L", "price": 199.99 },
                { "product_id": "P102", "quantity": 1 }
            ],
            "subtotal": 399.98,
            "payment_method": "COD",
            "status": "pending",
            "created_at": "2024-03-15T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(order.id, "o1");
        assert_eq!(order.customer_name(), "John Doe");
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.order_items[0].product.as_ref().and_then(ProductRef::title), Some("Shirt"));
        assert_eq!(order.order_items[1].product, Some(ProductRef::Id("P102".into())));
        assert_eq!(order.reported_status.as_deref(), Some("pending"));
        assert!(order.created_at.is_some());
    }

    #[test]
    fn numeric_ids_and_bare_dates_are_accepted() {
        let order: Order = serde_json::from_value(json!({
            "id": 2,
            "created_at": "2024-03-16",
            "updated_at": "not a date"
        }))
        .unwrap();

        assert_eq!(order.id, "2");
        assert_eq!(
            order.created_at.map(|ts| ts.format("%Y-%m-%d").to_string()).as_deref(),
            Some("2024-03-16")
        );
        assert_eq!(order.updated_at, None);
        assert_eq!(order.subtotal, 0.0);
    }

    #[test]
    fn order_without_id_is_rejected() {
        let result = serde_json::from_value::<Order>(json!({ "subtotal": 10 }));
        assert!(result.is_err());
    }

    #[test]
    fn loosely_typed_display_fields_fall_back_instead_of_failing() {
        let order: Order = serde_json::from_value(json!({
            "_id": "o7",
            "customer_details": { "first_name": "Sara", "phone": 971501234567u64, "city": null },
            "order_items": [
                { "product_id": "P1", "quantity": null, "price": "49.50" },
                { "product_id": true, "quantity": "3", "price": null },
                "not an item"
            ],
            "subtotal": "399.98",
            "payment_method": null,
            "status": 2
        }))
        .unwrap();

        assert_eq!(order.customer_details.phone.as_deref(), Some("971501234567"));
        assert_eq!(order.customer_details.city, None);
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.order_items[0].quantity, 0);
        assert_eq!(order.order_items[0].price, Some(49.5));
        assert_eq!(order.order_items[1].product, None);
        assert_eq!(order.order_items[1].quantity, 3);
        assert_eq!(order.subtotal, 399.98);
        assert_eq!(order.payment_method, None);
        assert_eq!(order.reported_status.as_deref(), Some("2"));
    }

    #[test]
    fn null_containers_become_empty() {
        let order: Order = serde_json::from_value(json!({
            "_id": "o8",
            "customer_details": null,
            "order_items": null,
            "subtotal": null
        }))
        .unwrap();

        assert_eq!(order.customer_details, CustomerDetails::default());
        assert!(order.order_items.is_empty());
        assert_eq!(order.subtotal, 0.0);
    }

    #[test]
    fn full_name_skips_missing_parts() {
        let customer = CustomerDetails {
            first_name: Some("Alice".into()),
            ..CustomerDetails::default()
        };
        assert_eq!(customer.full_name(), "Alice");
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Delivered".parse::<OrderStatus>(), Ok(OrderStatus::Delivered));
        assert!("shipped".parse::<OrderStatus>().is_err());
    }
}
