//! CLI command handler for budget checks

use std::path::Path;

use super::{render, OutputFormat};
use crate::display::format_validation_result;
use crate::error::PoolkeeperResult;
use crate::models::Budget;
use crate::validation::{ValidationResult, Validator};

/// Validate a whole budget document
pub fn check_budget_file(validator: &Validator, file: &Path) -> PoolkeeperResult<ValidationResult> {
    let budget = Budget::load(file)?;
    tracing::debug!(
        pools = budget.pools.len(),
        channels = budget.channels.len(),
        transactions = budget.transactions.len(),
        strategies = budget.strategies.len(),
        "loaded budget document"
    );
    Ok(validator.validate_budget(&budget))
}

/// Handle the check command. Returns `true` when the budget has no errors.
pub fn handle_check_command(
    validator: &Validator,
    file: &Path,
    format: OutputFormat,
) -> PoolkeeperResult<bool> {
    let result = check_budget_file(validator, file)?;

    match render(format, &result)? {
        Some(rendered) => println!("{}", rendered),
        None => print!(
            "{}",
            format_validation_result(&file.display().to_string(), &result)
        ),
    }

    Ok(result.is_valid)
}
