//! Allocation and transaction integrity engine
//!
//! [`Validator`] decides whether a proposed allocation, transaction,
//! strategy, balance state, or bulk import is internally consistent. It never
//! performs I/O and holds no mutable state: its only configuration is the
//! pair of tolerances (and a few import/balance knobs) fixed at construction,
//! so one instance can be shared freely across threads.
//!
//! The operations are split by concern:
//!
//! - `allocation`: breakdowns, strategies, and single pool allocations
//! - `transaction`: income, expense, and transfer records
//! - `credit`: credit-card payoff validation and the maximum payable amount
//! - `balance`: signed pool balances and expected-vs-actual agreement
//! - `integrity`: cross-entity referential integrity
//! - `import`: partitioning raw import rows into valid and invalid sets

pub mod allocation;
pub mod balance;
pub mod credit;
pub mod import;
pub mod integrity;
pub mod result;
pub mod schema;
pub mod transaction;

use chrono::{DateTime, Utc};

use crate::config::{Settings, Tolerances};

pub use import::{ImportValidation, InvalidImportRow};
pub use result::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
pub use schema::{Shape, ShapeIssue};

/// The integrity engine
#[derive(Debug, Clone, Default)]
pub struct Validator {
    tolerances: Tolerances,
    reference_time: Option<DateTime<Utc>>,
    import_date_formats: Vec<String>,
    credit_negative_as_warning: bool,
}

impl Validator {
    /// Create a validator with the given tolerances
    pub fn new(tolerances: Tolerances) -> Self {
        Self {
            tolerances,
            ..Default::default()
        }
    }

    /// Create a validator configured from user settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            tolerances: settings.tolerances,
            reference_time: None,
            import_date_formats: settings.import_date_formats.clone(),
            credit_negative_as_warning: settings.flag_credit_negative_as_warning,
        }
    }

    /// Pin "now" for date checks instead of reading the clock
    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.reference_time = Some(now);
        self
    }

    /// Report negative credit-channel balances as warnings
    pub fn with_credit_negative_as_warning(mut self, enabled: bool) -> Self {
        self.credit_negative_as_warning = enabled;
        self
    }

    /// Accept an additional strftime date format for import rows
    pub fn with_import_date_format(mut self, format: impl Into<String>) -> Self {
        self.import_date_formats.push(format.into());
        self
    }

    /// The tolerances in effect
    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.reference_time.unwrap_or_else(Utc::now)
    }

    pub(crate) fn shape_error<T: Shape>(&self, value: &T) -> Option<ValidationError> {
        schema::check_shape(value, &self.tolerances)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::models::{AllocationBreakdown, AllocationItem};

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    pub fn past() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 20, 9, 30, 0).unwrap()
    }

    pub fn future() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap()
    }

    pub fn validator() -> super::Validator {
        super::Validator::default().with_reference_time(now())
    }

    pub fn breakdown(items: &[(&str, f64)], total: f64) -> AllocationBreakdown {
        AllocationBreakdown::new(
            items
                .iter()
                .map(|(pool, amount)| AllocationItem::new(*pool, *amount))
                .collect(),
            total,
        )
    }
}
