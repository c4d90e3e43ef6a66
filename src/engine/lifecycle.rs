use std::fmt;

use serde_json::{Value, json};

use crate::models::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    Confirm,
    Cancel,
    Deliver,
    RevokeDelivered,
    AssignDeliveryType,
}

impl TransitionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransitionKind::Confirm => "confirm",
            TransitionKind::Cancel => "cancel",
            TransitionKind::Deliver => "deliver",
            TransitionKind::RevokeDelivered => "revoke_delivered",
            TransitionKind::AssignDeliveryType => "assign_delivery_type",
        }
    }

    /// Collection an order must sit in for this transition to be offered.
    pub fn source(self) -> OrderStatus {
        match self {
            TransitionKind::Confirm | TransitionKind::Cancel => OrderStatus::Pending,
            TransitionKind::Deliver | TransitionKind::AssignDeliveryType => OrderStatus::Confirmed,
            TransitionKind::RevokeDelivered => OrderStatus::Delivered,
        }
    }

    /// Re-fetched once the backend accepts the transition. Assignment keeps
    /// the order where it is but refreshes everything.
    pub fn refreshes(self) -> &'static [OrderStatus] {
        match self {
            TransitionKind::Confirm => &[OrderStatus::Pending, OrderStatus::Confirmed],
            TransitionKind::Cancel => &[OrderStatus::Pending, OrderStatus::Cancelled],
            TransitionKind::Deliver | TransitionKind::RevokeDelivered => {
                &[OrderStatus::Confirmed, OrderStatus::Delivered]
            }
            TransitionKind::AssignDeliveryType => &OrderStatus::ALL,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransitionKind::Confirm => "Confirm order",
            TransitionKind::Cancel => "Cancel order",
            TransitionKind::Deliver => "Mark as delivered",
            TransitionKind::RevokeDelivered => "Revoke delivery",
            TransitionKind::AssignDeliveryType => "Assign delivery type",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Confirm,
    Cancel,
    Deliver,
    RevokeDelivered,
    AssignDeliveryType { delivery_type_name: String },
}

impl Transition {
    pub fn kind(&self) -> TransitionKind {
        match self {
            Transition::Confirm => TransitionKind::Confirm,
            Transition::Cancel => TransitionKind::Cancel,
            Transition::Deliver => TransitionKind::Deliver,
            Transition::RevokeDelivered => TransitionKind::RevokeDelivered,
            Transition::AssignDeliveryType { .. } => TransitionKind::AssignDeliveryType,
        }
    }

    pub fn path(&self, order_id: &str) -> String {
        match self {
            Transition::Confirm => format!("/orders/confirm/{order_id}"),
            Transition::Cancel => format!("/orders/cancel/{order_id}"),
            Transition::Deliver => format!("/orders/deliver/{order_id}"),
            Transition::RevokeDelivered => format!("/orders/revoke-delivered/{order_id}"),
            Transition::AssignDeliveryType { .. } => {
                format!("/orders/{order_id}/assign-delivery-type")
            }
        }
    }

    pub fn body(&self) -> Option<Value> {
        match self {
            Transition::AssignDeliveryType { delivery_type_name } => {
                Some(json!({ "deliveryTypeName": delivery_type_name }))
            }
            _ => None,
        }
    }

    pub fn refreshes(&self) -> &'static [OrderStatus] {
        self.kind().refreshes()
    }
}

pub fn available_transitions(status: OrderStatus) -> &'static [TransitionKind] {
    match status {
        OrderStatus::Pending => &[TransitionKind::Confirm, TransitionKind::Cancel],
        OrderStatus::Confirmed => &[TransitionKind::Deliver, TransitionKind::AssignDeliveryType],
        OrderStatus::Delivered => &[TransitionKind::RevokeDelivered],
        OrderStatus::Cancelled => &[],
    }
}
