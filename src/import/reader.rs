//! CSV and JSON row readers
//!
//! Turns bank exports into [`ImportRow`]s for the import pipeline. Header
//! names are normalized so common bank column names land on the canonical
//! `date` / `description` / `amount` / `type` keys.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use super::row::{ImportRow, ImportValue};
use crate::error::{PoolkeeperError, PoolkeeperResult};
use crate::models::budget::extension;

/// Map a raw header onto the canonical key the pipeline expects
fn canonical_header(header: &str) -> String {
    let h = header.trim().to_lowercase();
    if h == "date" || h.contains("posted") || h.contains("transaction date") {
        "date".to_string()
    } else if h.contains("description")
        || h.contains("payee")
        || h.contains("merchant")
        || h == "name"
        || h == "memo"
    {
        "description".to_string()
    } else if h.contains("amount") {
        "amount".to_string()
    } else if h == "type" || h.contains("kind") {
        "type".to_string()
    } else {
        h
    }
}

/// Where a CSV column's cells end up
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Column {
    Field(String),
    Outflow,
    Inflow,
    Skip,
}

/// Separate debit/credit style amount columns
fn flow_column(header: &str) -> Option<Column> {
    let h = header.trim().to_lowercase();
    if h.contains("debit") || h.contains("outflow") || h.contains("withdrawal") {
        Some(Column::Outflow)
    } else if h.contains("credit") || h.contains("inflow") || h.contains("deposit") {
        Some(Column::Inflow)
    } else {
        None
    }
}

/// Decide where every column goes
///
/// The first column mapped to a key wins and later ones are ignored. When
/// both debit and credit columns exist, or there is no plain amount column,
/// they are combined into a signed `amount` and any plain amount column is
/// ignored.
fn plan_columns<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<Column> {
    let mut seen = HashSet::new();
    let mut plan: Vec<Column> = headers
        .map(|header| {
            let key = canonical_header(header);
            let column = match flow_column(header) {
                Some(flow) if !matches!(key.as_str(), "date" | "description" | "type") => flow,
                _ => Column::Field(key),
            };
            if seen.insert(column.clone()) {
                column
            } else {
                tracing::debug!(header, "ignoring repeated column");
                Column::Skip
            }
        })
        .collect();

    let has_outflow = seen.contains(&Column::Outflow);
    let has_inflow = seen.contains(&Column::Inflow);
    let has_amount = seen.contains(&Column::Field("amount".to_string()));
    let use_flows = (has_outflow && has_inflow) || !has_amount;

    for column in &mut plan {
        let skip = match column {
            Column::Outflow | Column::Inflow => !use_flows,
            Column::Field(key) => use_flows && key.as_str() == "amount",
            Column::Skip => false,
        };
        if skip {
            *column = Column::Skip;
        }
    }
    plan
}

/// Parse an amount cell, handling currency symbols, commas, and accounting negatives
///
/// Cells containing letters are rejected rather than stripped down to
/// whatever digits they happen to contain.
pub fn parse_amount_cell(s: &str) -> Option<f64> {
    if s.chars().any(char::is_alphabetic) {
        return None;
    }

    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '(' || *c == ')')
        .collect();

    let (negative, value) = if cleaned.starts_with('(') && cleaned.ends_with(')') {
        (true, &cleaned[1..cleaned.len() - 1])
    } else if let Some(stripped) = cleaned.strip_prefix('-') {
        (true, stripped)
    } else {
        (false, cleaned.as_str())
    };

    if value.is_empty() {
        return None;
    }

    value
        .parse::<f64>()
        .ok()
        .map(|n| if negative { -n } else { n })
}

fn cell_value(key: &str, cell: &str) -> ImportValue {
    if cell.is_empty() {
        ImportValue::Null
    } else if key == "amount" {
        parse_amount_cell(cell)
            .map(ImportValue::Number)
            .unwrap_or_else(|| ImportValue::Text(cell.to_string()))
    } else {
        ImportValue::Text(cell.to_string())
    }
}

/// Combine debit/credit cells into one signed amount: debits negative,
/// credits positive. An unparseable cell is kept as text.
fn combine_flows(flows: &[(f64, &str)]) -> ImportValue {
    let mut total: Option<f64> = None;
    for (sign, cell) in flows {
        if cell.is_empty() {
            continue;
        }
        match parse_amount_cell(cell) {
            Some(n) => *total.get_or_insert(0.0) += sign * n.abs(),
            None => return ImportValue::Text(cell.to_string()),
        }
    }
    total.map_or(ImportValue::Null, ImportValue::Number)
}

/// Read a headered CSV into rows
pub fn read_csv_rows<R: Read>(reader: R) -> PoolkeeperResult<Vec<ImportRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let plan = plan_columns(reader.headers()?.iter());
    let has_flows = plan
        .iter()
        .any(|c| matches!(c, Column::Outflow | Column::Inflow));

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = ImportRow::new();
        let mut flows = Vec::new();

        for (column, cell) in plan.iter().zip(record.iter()) {
            match column {
                Column::Field(key) => row.insert(key.clone(), cell_value(key, cell)),
                Column::Outflow => flows.push((-1.0, cell)),
                Column::Inflow => flows.push((1.0, cell)),
                Column::Skip => {}
            }
        }
        if has_flows {
            row.insert("amount", combine_flows(&flows));
        }
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), columns = plan.len(), "read CSV rows");
    Ok(rows)
}

/// Read a JSON array of objects into rows
pub fn read_json_rows<R: Read>(reader: R) -> PoolkeeperResult<Vec<ImportRow>> {
    let rows: Vec<ImportRow> = serde_json::from_reader(reader)?;
    tracing::debug!(rows = rows.len(), "read JSON rows");
    Ok(rows)
}

/// Read rows from a file, picking the format from its extension
pub fn read_rows(path: &Path) -> PoolkeeperResult<Vec<ImportRow>> {
    let file = std::fs::File::open(path).map_err(|e| {
        PoolkeeperError::Io(format!("Failed to open {}: {}", path.display(), e))
    })?;

    match extension(path).as_deref() {
        Some("csv") => read_csv_rows(file),
        Some("json") => read_json_rows(file),
        other => Err(PoolkeeperError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_cell() {
        assert_eq!(parse_amount_cell("$1,234.50"), Some(1234.5));
        assert_eq!(parse_amount_cell("(42.00)"), Some(-42.0));
        assert_eq!(parse_amount_cell("-7"), Some(-7.0));
        assert_eq!(parse_amount_cell("invalid"), None);
    }

    #[test]
    fn test_parse_amount_cell_rejects_letters() {
        assert_eq!(parse_amount_cell("1e5"), None);
        assert_eq!(parse_amount_cell("12 apples 34"), None);
        assert_eq!(parse_amount_cell(" 12.00 "), Some(12.0));
    }

    #[test]
    fn test_garbage_amount_stays_text() {
        let data = "Date,Description,Amount,Type\n2025-01-15,Coffee,12 apples 34,expense\n";
        let rows = read_csv_rows(data.as_bytes()).unwrap();
        assert_eq!(rows[0].get("amount"), Some(&ImportValue::from("12 apples 34")));
    }

    #[test]
    fn test_debit_and_credit_columns_combine() {
        let data = "Date,Description,Debit Amount,Credit Amount,Type\n\
                    2025-01-15,Coffee,4.50,,expense\n\
                    2025-01-16,Paycheck,,1200.00,income\n\
                    2025-01-17,Nothing,,,expense\n\
                    2025-01-18,Broken,abc,,expense\n";
        let rows = read_csv_rows(data.as_bytes()).unwrap();
        assert_eq!(rows[0].get("amount"), Some(&ImportValue::Number(-4.5)));
        assert_eq!(rows[1].get("amount"), Some(&ImportValue::Number(1200.0)));
        assert_eq!(rows[2].get("amount"), Some(&ImportValue::Null));
        assert_eq!(rows[3].get("amount"), Some(&ImportValue::from("abc")));
        assert!(rows[0].get("debit amount").is_none());
    }

    #[test]
    fn test_first_amount_column_wins() {
        let data = "Date,Description,Amount,Running Amount,Type\n\
                    2025-01-15,Coffee,4.50,,expense\n";
        let rows = read_csv_rows(data.as_bytes()).unwrap();
        assert_eq!(rows[0].get("amount"), Some(&ImportValue::Number(4.5)));
    }

    #[test]
    fn test_split_amount_rows_pass_import() {
        let data = "Date,Description,Debit Amount,Credit Amount,Type\n\
                    2025-01-15,Coffee,4.50,,expense\n";
        let rows = read_csv_rows(data.as_bytes()).unwrap();
        let report = crate::validation::Validator::default().validate_import_data(rows);
        assert!(report.all_valid());
    }

    #[test]
    fn test_canonical_headers() {
        assert_eq!(canonical_header("Posted Date"), "date");
        assert_eq!(canonical_header("Payee"), "description");
        assert_eq!(canonical_header(" Amount "), "amount");
        assert_eq!(canonical_header("Type"), "type");
        assert_eq!(canonical_header("Category"), "category");
    }

    #[test]
    fn test_read_csv_rows() {
        let data = "Date,Description,Amount,Type\n\
                    2025-01-15,Coffee,$4.50,expense\n\
                    2025-01-16,,oops,income\n";
        let rows = read_csv_rows(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].get("amount"), Some(&ImportValue::Number(4.5)));
        assert_eq!(rows[0].get("description"), Some(&ImportValue::from("Coffee")));

        assert_eq!(rows[1].get("description"), Some(&ImportValue::Null));
        assert_eq!(rows[1].get("amount"), Some(&ImportValue::from("oops")));
    }

    #[test]
    fn test_read_json_rows() {
        let data = r#"[{"date": "2025-01-15", "amount": 12}]"#;
        let rows = read_json_rows(data.as_bytes()).unwrap();
        assert_eq!(rows[0].get("amount"), Some(&ImportValue::Number(12.0)));
    }
}
