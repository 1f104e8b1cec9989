//! CLI command handler for import validation
//!
//! Reads rows from a CSV export or JSON array and partitions them without
//! writing anything.

use std::path::Path;

use super::{render, OutputFormat};
use crate::display::format_import_report;
use crate::error::PoolkeeperResult;
use crate::import::read_rows;
use crate::validation::Validator;

/// Handle the import command. Returns `true` when every row is valid.
pub fn handle_import_command(
    validator: &Validator,
    file: &Path,
    format: OutputFormat,
) -> PoolkeeperResult<bool> {
    let rows = read_rows(file)?;
    tracing::debug!(rows = rows.len(), file = %file.display(), "read import rows");

    let report = validator.validate_import_data(rows);

    match render(format, &report)? {
        Some(rendered) => println!("{}", rendered),
        None if report.total() == 0 => println!("No rows found in {}.", file.display()),
        None => print!("{}", format_import_report(&report)),
    }

    Ok(report.all_valid())
}
