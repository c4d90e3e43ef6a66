pub mod confirm;
pub mod detail;
pub mod list;

use chrono::{DateTime, Utc};

pub use confirm::ConfirmationPrompt;
pub use detail::render_detail;
pub use list::{ListPage, OrderListView, render_table};

pub(crate) fn format_money(amount: f64) -> String {
    format!("${amount:.2}")
}

pub(crate) fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

pub(crate) fn format_datetime(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

pub(crate) fn or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => "N/A".to_string(),
    }
}
