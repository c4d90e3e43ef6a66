use std::fmt;

use crate::engine::lifecycle::Transition;
use crate::models::Order;
use crate::views::format_money;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationPrompt {
    pub transition: Transition,
    pub order_id: String,
    pub customer: Option<String>,
    pub total: Option<f64>,
}

impl ConfirmationPrompt {
    pub fn new(transition: Transition, order_id: &str, order: Option<&Order>) -> Self {
        Self {
            transition,
            order_id: order_id.to_string(),
            customer: order
                .map(Order::customer_name)
                .filter(|name| !name.is_empty()),
            total: order.map(|order| order.subtotal),
        }
    }

    /// `y` / `yes`, case-insensitive.
    pub fn accepts(answer: &str) -> bool {
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

impl fmt::Display for ConfirmationPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.transition.kind().label(), self.order_id)?;

        if let Some(customer) = &self.customer {
            write!(f, " for {customer}")?;
        }
        if let Some(total) = self.total {
            write!(f, " (total {})", format_money(total))?;
        }
        if let Transition::AssignDeliveryType { delivery_type_name } = &self.transition {
            write!(f, " as \"{delivery_type_name}\"")?;
        }

        f.write_str("? [y/N] ")
    }
}
