pub mod search;
pub mod spreadsheet;

pub use search::filter_orders;
pub use spreadsheet::{ExportError, ExportRow, export_rows, write_workbook};
