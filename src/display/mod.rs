//! Display formatting for terminal output
//!
//! Renders validation results and import partitions as tables.

pub mod report;

pub use report::{format_import_report, format_validation_result, truncate};
