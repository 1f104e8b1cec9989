//! Import reconciliation pipeline
//!
//! Partitions a raw batch of candidate transactions into valid and invalid
//! sets. Each row is checked independently and every check runs, so an
//! invalid row carries its complete list of problems.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::HashMap;

use super::result::{ErrorCode, ValidationError, ValidationWarning, WarningCode};
use super::Validator;
use crate::import::{ImportRow, ImportValue};
use crate::models::TransactionType;

/// Date formats tried after RFC 3339
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d/%m/%Y", "%Y/%m/%d", "%m-%d-%Y", "%d-%m-%Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// A rejected row with everything wrong with it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidImportRow<T> {
    /// Zero-based position in the input batch
    pub row: usize,
    pub transaction: T,
    pub errors: Vec<ValidationError>,
}

/// Output of the import pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportValidation<T> {
    pub valid: Vec<T>,
    pub invalid: Vec<InvalidImportRow<T>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ValidationWarning>,
}

impl<T> Default for ImportValidation<T> {
    fn default() -> Self {
        Self {
            valid: Vec::new(),
            invalid: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl<T> ImportValidation<T> {
    /// Total rows seen
    pub fn total(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    /// Whether every row passed
    pub fn all_valid(&self) -> bool {
        self.invalid.is_empty()
    }
}

fn missing(field: &str) -> ValidationError {
    ValidationError::on(
        field,
        ErrorCode::ImportMissingRequiredField,
        format!("Missing required field: {}", field),
    )
}

impl Validator {
    /// Split raw import rows into valid and invalid sets
    pub fn validate_import_data(&self, rows: Vec<ImportRow>) -> ImportValidation<ImportRow> {
        let mut report = ImportValidation::default();
        let mut seen: HashMap<(String, u64, String), usize> = HashMap::with_capacity(rows.len());

        for (idx, row) in rows.into_iter().enumerate() {
            let errors = self.check_import_row(&row);

            if let Some(key) = duplicate_key(&row) {
                if let Some(first) = seen.get(&key) {
                    report.warnings.push(ValidationWarning::on(
                        format!("rows.{}", idx),
                        WarningCode::ImportDuplicateRow,
                        format!("Row {} looks like a duplicate of row {}", idx + 1, first + 1),
                    ));
                } else {
                    seen.insert(key, idx);
                }
            }

            if errors.is_empty() {
                report.valid.push(row);
            } else {
                report.invalid.push(InvalidImportRow {
                    row: idx,
                    transaction: row,
                    errors,
                });
            }
        }

        tracing::debug!(
            valid = report.valid.len(),
            invalid = report.invalid.len(),
            duplicates = report.warnings.len(),
            "validated import batch"
        );
        report
    }

    fn check_import_row(&self, row: &ImportRow) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        match row.get("date") {
            None => errors.push(missing("date")),
            Some(value) if value.is_blank() => errors.push(missing("date")),
            Some(value) => {
                let parsed = value.as_text().is_some_and(|s| self.parse_import_date(s));
                if !parsed {
                    errors.push(
                        ValidationError::on(
                            "date",
                            ErrorCode::ImportInvalidDate,
                            format!("Could not parse date: '{}'", value),
                        )
                        .with_detail("value", value.to_json()),
                    );
                }
            }
        }

        let description = row.get("description").and_then(ImportValue::as_text);
        if description.map_or(true, |s| s.trim().is_empty()) {
            errors.push(missing("description"));
        }

        match row.get("amount") {
            None | Some(ImportValue::Null) => errors.push(missing("amount")),
            Some(ImportValue::Text(s)) if s.trim().is_empty() => errors.push(missing("amount")),
            Some(ImportValue::Number(n)) if n.is_finite() && *n != 0.0 => {}
            Some(value) => errors.push(
                ValidationError::on(
                    "amount",
                    ErrorCode::ImportInvalidAmount,
                    format!("Amount must be a non-zero number, got '{}'", value),
                )
                .with_detail("value", value.to_json()),
            ),
        }

        let has_type = row
            .get("type")
            .and_then(ImportValue::as_text)
            .and_then(TransactionType::parse)
            .is_some();
        if !has_type {
            errors.push(missing("type").with_detail(
                "allowed",
                serde_json::json!(["income", "expense", "transfer"]),
            ));
        }

        errors
    }

    fn parse_import_date(&self, s: &str) -> bool {
        let s = s.trim();
        if DateTime::parse_from_rfc3339(s).is_ok() {
            return true;
        }
        if DATETIME_FORMATS
            .iter()
            .any(|f| NaiveDateTime::parse_from_str(s, f).is_ok())
        {
            return true;
        }
        DATE_FORMATS
            .iter()
            .copied()
            .chain(self.import_date_formats.iter().map(String::as_str))
            .any(|f| NaiveDate::parse_from_str(s, f).is_ok())
    }
}

/// Identity of a row for duplicate detection, when it has the fields for one
fn duplicate_key(row: &ImportRow) -> Option<(String, u64, String)> {
    let date = row.get("date")?.as_text()?.trim().to_string();
    let amount = match row.get("amount")? {
        ImportValue::Number(n) if n.is_finite() => n.to_bits(),
        _ => return None,
    };
    let description = row.get("description")?.as_text()?.trim().to_lowercase();
    Some((date, amount, description))
}
