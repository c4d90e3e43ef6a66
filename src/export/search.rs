use crate::models::Order;

pub fn filter_orders(orders: &[Order], query: &str) -> Vec<Order> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return orders.to_vec();
    }

    orders
        .iter()
        .filter(|order| matches(order, &needle))
        .cloned()
        .collect()
}

fn matches(order: &Order, needle: &str) -> bool {
    let customer = &order.customer_details;
    let full_name = customer.full_name();

    [
        customer.first_name.as_deref(),
        customer.last_name.as_deref(),
        Some(full_name.as_str()),
        customer.phone.as_deref(),
        Some(order.id.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}
