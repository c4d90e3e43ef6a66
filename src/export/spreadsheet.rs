use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::Serialize;
use thiserror::Error;

use crate::models::{Order, OrderStatus};
use crate::views::format_date;

pub const HEADERS: [&str; 10] = [
    "Order ID",
    "Customer Name",
    "Email",
    "Phone",
    "Address",
    "Items",
    "Subtotal",
    "Payment Method",
    "Date",
    "Delivery Type",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no data to export")]
    Empty,

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub order_id: String,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub items: usize,
    pub subtotal: f64,
    pub payment_method: String,
    pub date: String,
    pub delivery_type: String,
}

impl From<&Order> for ExportRow {
    fn from(order: &Order) -> Self {
        let customer = &order.customer_details;
        let address = [customer.address.as_deref(), customer.city.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            order_id: order.id.clone(),
            customer_name: order.customer_name(),
            email: customer.email.clone().unwrap_or_default(),
            phone: customer.phone.clone().unwrap_or_default(),
            address,
            items: order.item_count(),
            subtotal: order.subtotal,
            payment_method: order.payment_method.clone().unwrap_or_default(),
            date: order.created_at.map(format_date).unwrap_or_default(),
            delivery_type: order
                .delivery_type_name
                .clone()
                .unwrap_or_else(|| "Not assigned".to_string()),
        }
    }
}

pub fn export_rows(orders: &[Order]) -> Vec<ExportRow> {
    orders.iter().map(ExportRow::from).collect()
}

pub fn sheet_name(status: OrderStatus) -> String {
    format!("{} Orders", status.title())
}

pub fn default_file_name(status: OrderStatus) -> String {
    format!("{}Orders.xlsx", status.title())
}

pub fn write_workbook(rows: &[ExportRow], sheet: &str, path: &Path) -> Result<(), ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet)?;

    for (col, title) in (0u16..).zip(HEADERS) {
        worksheet.write_string_with_format(0, col, title, &header)?;
    }

    for (row, record) in (1u32..).zip(rows) {
        worksheet.write_string(row, 0, &record.order_id)?;
        worksheet.write_string(row, 1, &record.customer_name)?;
        worksheet.write_string(row, 2, &record.email)?;
        worksheet.write_string(row, 3, &record.phone)?;
        worksheet.write_string(row, 4, &record.address)?;
        worksheet.write_number(row, 5, record.items as f64)?;
        worksheet.write_number(row, 6, record.subtotal)?;
        worksheet.write_string(row, 7, &record.payment_method)?;
        worksheet.write_string(row, 8, &record.date)?;
        worksheet.write_string(row, 9, &record.delivery_type)?;
    }

    worksheet.autofit();
    workbook.save(path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn order() -> Order {
        serde_json::from_value(json!({
            "_id": "o1",
            "customer_details": {
                "first_name": "Jane",
                "last_name": "Smith",
                "email": "jane@example.com",
                "phone": "+971502345678",
                "address": "Corniche Road",
                "city": "Abu Dhabi"
            },
            "order_items": [{ "product_id": "P1", "quantity": 1 }, { "product_id": "P2", "quantity": 3 }],
            "subtotal": 250.5,
            "payment_method": "COD",
            "created_at": "2024-03-16T09:15:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn projects_order_into_flat_row() {
        let row = ExportRow::from(&order());

        assert_eq!(
            row,
            ExportRow {
                order_id: "o1".into(),
                customer_name: "Jane Smith".into(),
                email: "jane@example.com".into(),
                phone: "+971502345678".into(),
                address: "Corniche Road, Abu Dhabi".into(),
                items: 2,
                subtotal: 250.5,
                payment_method: "COD".into(),
                date: "2024-03-16".into(),
                delivery_type: "Not assigned".into(),
            }
        );
    }

    #[test]
    fn names_follow_status() {
        assert_eq!(sheet_name(OrderStatus::Delivered), "Delivered Orders");
        assert_eq!(default_file_name(OrderStatus::Confirmed), "ConfirmedOrders.xlsx");
    }

    #[test]
    fn empty_export_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");

        let result = write_workbook(&[], "Pending Orders", &path);

        assert!(matches!(result, Err(ExportError::Empty)));
        assert!(!path.exists());
    }

    #[test]
    fn writes_xlsx_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("ConfirmedOrders.xlsx");

        write_workbook(&export_rows(&[order()]), "Confirmed Orders", &path)?;

        let bytes = std::fs::read(&path)?;
        assert!(bytes.starts_with(b"PK"), "xlsx is a zip container");

        Ok(())
    }
}
