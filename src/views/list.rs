use std::sync::Arc;

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

use crate::engine::lifecycle::{TransitionKind, available_transitions};
use crate::export::search::filter_orders;
use crate::models::{Order, OrderStatus};
use crate::store::OrderStore;
use crate::views::{format_date, format_money, or_na};

pub struct OrderListView {
    status: OrderStatus,
    store: Arc<OrderStore>,
}

impl OrderListView {
    pub fn new(status: OrderStatus, store: Arc<OrderStore>) -> Self {
        Self { status, store }
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn actions(&self) -> &'static [TransitionKind] {
        available_transitions(self.status)
    }

    pub async fn open(&self, query: &str) -> ListPage {
        self.store.fetch(self.status).await;
        self.page(query)
    }

    /// Page over whatever is loaded now, without fetching.
    pub fn page(&self, query: &str) -> ListPage {
        let orders = self.store.orders(self.status);
        ListPage {
            status: self.status,
            total: orders.len(),
            orders: filter_orders(&orders, query),
            actions: self.actions(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListPage {
    pub status: OrderStatus,
    pub total: usize,
    pub orders: Vec<Order>,
    pub actions: &'static [TransitionKind],
}

impl ListPage {
    pub fn render(&self) -> String {
        let mut out = format!(
            "{} Orders ({} of {})\n",
            self.status.title(),
            self.orders.len(),
            self.total
        );
        out.push_str(&render_table(&self.orders));

        if !self.actions.is_empty() {
            let actions: Vec<&str> = self.actions.iter().map(|kind| kind.label()).collect();
            out.push_str(&format!("\nActions: {}\n", actions.join(", ")));
        }

        out
    }
}

pub fn render_table(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "No orders found.\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record([
        "Order ID",
        "Customer",
        "Contact",
        "Items",
        "Total",
        "Payment",
        "Date",
        "Delivery Type",
    ]);

    for order in orders {
        builder.push_record([
            order.id.clone(),
            order.customer_name(),
            or_na(order.customer_details.phone.as_deref()),
            order.item_count().to_string(),
            format_money(order.subtotal),
            or_na(order.payment_method.as_deref()),
            order.created_at.map(format_date).unwrap_or_default(),
            order
                .delivery_type_name
                .clone()
                .unwrap_or_else(|| "Not assigned".to_string()),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..5), Alignment::right());

    format!("{table}\n")
}
