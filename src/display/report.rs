//! Validation report formatting for terminal output

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::import::ImportRow;
use crate::validation::{ImportValidation, ValidationError, ValidationResult, ValidationWarning};

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "Severity")]
    severity: &'static str,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&ValidationError> for IssueRow {
    fn from(e: &ValidationError) -> Self {
        Self {
            severity: "error",
            code: e.code.to_string(),
            field: e.field.clone().unwrap_or_default(),
            message: e.message.clone(),
        }
    }
}

impl From<&ValidationWarning> for IssueRow {
    fn from(w: &ValidationWarning) -> Self {
        Self {
            severity: "warning",
            code: w.code.to_string(),
            field: w.field.clone().unwrap_or_default(),
            message: w.message.clone(),
        }
    }
}

#[derive(Tabled)]
struct RejectedRow {
    #[tabled(rename = "Row")]
    row: usize,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Problems")]
    problems: String,
}

fn cell(row: &ImportRow, key: &str) -> String {
    row.get(key).map(|v| v.to_string()).unwrap_or_default()
}

/// Truncate a string to a maximum length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Format a validation result as a summary line plus an issue table
pub fn format_validation_result(title: &str, result: &ValidationResult) -> String {
    let mut output = String::new();
    let status = if result.is_valid { "VALID" } else { "INVALID" };
    output.push_str(&format!(
        "{}: {} ({} errors, {} warnings)\n",
        title,
        status,
        result.errors.len(),
        result.warnings.len()
    ));

    if result.errors.is_empty() && result.warnings.is_empty() {
        return output;
    }

    let rows: Vec<IssueRow> = result
        .errors
        .iter()
        .map(IssueRow::from)
        .chain(result.warnings.iter().map(IssueRow::from))
        .collect();
    output.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    output.push('\n');
    output
}

/// Format an import partition: counts, then every rejected row with its problems
pub fn format_import_report(report: &ImportValidation<ImportRow>) -> String {
    let mut output = String::new();
    output.push_str("Import Validation\n");
    output.push_str(&format!("{}\n", "=".repeat(40)));
    output.push_str(&format!("  Rows:        {}\n", report.total()));
    output.push_str(&format!("  Valid:       {}\n", report.valid.len()));
    output.push_str(&format!("  Invalid:     {}\n", report.invalid.len()));
    if !report.warnings.is_empty() {
        output.push_str(&format!("  Duplicates:  {}\n", report.warnings.len()));
    }

    if report.invalid.is_empty() {
        return output;
    }

    let rows: Vec<RejectedRow> = report
        .invalid
        .iter()
        .map(|rejected| RejectedRow {
            row: rejected.row + 1,
            date: cell(&rejected.transaction, "date"),
            description: truncate(&cell(&rejected.transaction, "description"), 30),
            amount: cell(&rejected.transaction, "amount"),
            problems: rejected
                .errors
                .iter()
                .map(|e| e.code.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    output.push('\n');
    output.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{ErrorCode, Validator};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer description", 10), "a much ...");
        assert_eq!(truncate("abcdef", 2), "..");
    }

    #[test]
    fn test_valid_result_has_no_table() {
        let output = format_validation_result("Budget", &ValidationResult::valid());
        assert_eq!(output, "Budget: VALID (0 errors, 0 warnings)\n");
    }

    #[test]
    fn test_result_table_lists_codes() {
        let result = ValidationResult::from_errors(vec![ValidationError::on(
            "amount",
            ErrorCode::TransactionAmountInvalid,
            "must be positive",
        )]);
        let output = format_validation_result("Budget", &result);
        assert!(output.contains("INVALID"));
        assert!(output.contains("TRANSACTION_AMOUNT_INVALID"));
        assert!(output.contains("must be positive"));
    }

    #[test]
    fn test_import_report_lists_rejections() {
        let rows = vec![ImportRow::new()
            .with("date", "2025-01-15")
            .with("description", "Coffee")
            .with("amount", "lots")
            .with("type", "expense")];
        let report = Validator::default().validate_import_data(rows);
        let output = format_import_report(&report);
        assert!(output.contains("Invalid:     1"));
        assert!(output.contains("IMPORT_INVALID_AMOUNT"));
    }

    #[test]
    fn test_import_report_uses_input_row_numbers() {
        let good = |description: &str| {
            ImportRow::new()
                .with("date", "2025-01-15")
                .with("description", description)
                .with("amount", 4.5)
                .with("type", "expense")
        };
        let rows = vec![
            good("a"),
            good("b"),
            good("c"),
            good("d").with("amount", "junk"),
        ];
        let report = Validator::default().validate_import_data(rows);
        let output = format_import_report(&report);
        assert!(output.contains("│ 4 "), "{}", output);
        assert!(!output.contains("│ 1 "), "{}", output);
    }
}
