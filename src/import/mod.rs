//! Import sources
//!
//! Raw rows for the import reconciliation pipeline, read from CSV bank
//! exports or JSON arrays. Validation itself lives in
//! [`Validator::validate_import_data`](crate::validation::Validator::validate_import_data).

pub mod reader;
pub mod row;

pub use reader::{parse_amount_cell, read_csv_rows, read_json_rows, read_rows};
pub use row::{ImportRow, ImportValue};
