use std::fmt::Write;

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::models::{Order, ProductRef};
use crate::views::{format_datetime, format_money, or_na};

pub fn render_detail(order: &Order) -> String {
    let mut out = String::new();
    let customer = &order.customer_details;

    let _ = writeln!(out, "Order Information");
    let _ = writeln!(out, "  Order ID:       {}", order.id);
    let _ = writeln!(
        out,
        "  Date:           {}",
        order
            .created_at
            .map(format_datetime)
            .unwrap_or_else(|| "N/A".to_string())
    );
    let _ = writeln!(out, "  Status:         {}", or_na(order.reported_status.as_deref()));
    let _ = writeln!(out, "  Payment Method: {}", or_na(order.payment_method.as_deref()));
    let _ = writeln!(out, "  Subtotal:       {}", format_money(order.subtotal));
    let _ = writeln!(
        out,
        "  Delivery Type:  {}",
        order.delivery_type_name.as_deref().unwrap_or("Not assigned")
    );

    let _ = writeln!(out, "\nCustomer Details");
    let name = order.customer_name();
    let _ = writeln!(out, "  Name:           {}", or_na(Some(name.as_str())));
    let _ = writeln!(out, "  Email:          {}", or_na(customer.email.as_deref()));
    let _ = writeln!(out, "  Phone:          {}", or_na(customer.phone.as_deref()));
    let _ = writeln!(out, "  Address:        {}", or_na(customer.address.as_deref()));
    let _ = writeln!(out, "  Apartment:      {}", or_na(customer.apartment.as_deref()));
    let _ = writeln!(out, "  City:           {}", or_na(customer.city.as_deref()));
    let _ = writeln!(out, "  Postal Code:    {}", or_na(customer.postal_code.as_deref()));
    let _ = writeln!(out, "  Delivery City:  {}", or_na(customer.delivery_city.as_deref()));

    let _ = writeln!(out, "\nOrder Items");
    if order.order_items.is_empty() {
        let _ = writeln!(out, "  (none)");
    } else {
        let mut builder = Builder::default();
        builder.push_record(["Product", "Size", "Quantity", "Price", "Attributes"]);
        for item in &order.order_items {
            builder.push_record([
                product_label(item.product.as_ref()),
                or_na(item.size.as_deref()),
                item.quantity.to_string(),
                format_money(item.price.unwrap_or_default()),
                item.selected_attributes
                    .as_ref()
                    .map(attributes_label)
                    .unwrap_or_default(),
            ]);
        }
        let mut table = builder.build();
        table.with(Style::sharp());
        let _ = writeln!(out, "{table}");
    }

    if let Some(notes) = order.order_notes.as_deref().filter(|notes| !notes.trim().is_empty()) {
        let _ = writeln!(out, "\nOrder Notes\n  {notes}");
    }

    out
}

fn product_label(product: Option<&ProductRef>) -> String {
    match product {
        Some(ProductRef::Populated {
            title: Some(title), ..
        }) => title.clone(),
        Some(ProductRef::Populated { id: Some(id), .. }) | Some(ProductRef::Id(id)) => id.clone(),
        _ => "N/A".to_string(),
    }
}

fn attributes_label(attributes: &serde_json::Value) -> String {
    match attributes {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Object(map) => map
            .iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(text) => format!("{key}: {text}"),
                other => format!("{key}: {other}"),
            })
            .collect::<Vec<_>>()
            .join(", "),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
