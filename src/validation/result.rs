//! Validation result types
//!
//! Every validator returns a [`ValidationResult`]. Expected failures are data,
//! not `Err` values, so a caller can show a user every problem at once.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Class of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The shape layer rejected the object; deeper checks were skipped
    SchemaValidationFailed,

    AllocationEmpty,
    AllocationNegativeAmount,
    AllocationSumInvalid,
    AllocationDuplicatePool,
    AllocationExceedsBalance,

    TransactionAmountInvalid,
    TransactionDateInvalid,
    TransactionDescriptionEmpty,
    TransactionAllocationMismatch,
    TransactionChannelNotFound,
    TransactionPoolNotFound,

    BalanceNegative,
    BalanceInconsistent,

    CreditPaymentInvalidSource,

    DataIntegrityOrphanedReference,
    DataIntegrityInvalidState,

    ImportMissingRequiredField,
    ImportInvalidDate,
    ImportInvalidAmount,
}

impl ErrorCode {
    /// The wire name, e.g. `ALLOCATION_SUM_INVALID`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SchemaValidationFailed => "SCHEMA_VALIDATION_FAILED",
            Self::AllocationEmpty => "ALLOCATION_EMPTY",
            Self::AllocationNegativeAmount => "ALLOCATION_NEGATIVE_AMOUNT",
            Self::AllocationSumInvalid => "ALLOCATION_SUM_INVALID",
            Self::AllocationDuplicatePool => "ALLOCATION_DUPLICATE_POOL",
            Self::AllocationExceedsBalance => "ALLOCATION_EXCEEDS_BALANCE",
            Self::TransactionAmountInvalid => "TRANSACTION_AMOUNT_INVALID",
            Self::TransactionDateInvalid => "TRANSACTION_DATE_INVALID",
            Self::TransactionDescriptionEmpty => "TRANSACTION_DESCRIPTION_EMPTY",
            Self::TransactionAllocationMismatch => "TRANSACTION_ALLOCATION_MISMATCH",
            Self::TransactionChannelNotFound => "TRANSACTION_CHANNEL_NOT_FOUND",
            Self::TransactionPoolNotFound => "TRANSACTION_POOL_NOT_FOUND",
            Self::BalanceNegative => "BALANCE_NEGATIVE",
            Self::BalanceInconsistent => "BALANCE_INCONSISTENT",
            Self::CreditPaymentInvalidSource => "CREDIT_PAYMENT_INVALID_SOURCE",
            Self::DataIntegrityOrphanedReference => "DATA_INTEGRITY_ORPHANED_REFERENCE",
            Self::DataIntegrityInvalidState => "DATA_INTEGRITY_INVALID_STATE",
            Self::ImportMissingRequiredField => "IMPORT_MISSING_REQUIRED_FIELD",
            Self::ImportInvalidDate => "IMPORT_INVALID_DATE",
            Self::ImportInvalidAmount => "IMPORT_INVALID_AMOUNT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class of a non-blocking observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    /// Negative balance on a credit channel
    BalanceNegativeCredit,
    /// A breakdown item of exactly zero
    AllocationZeroAmount,
    /// Two import rows share date, amount, and description
    ImportDuplicateRow,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BalanceNegativeCredit => "BALANCE_NEGATIVE_CREDIT",
            Self::AllocationZeroAmount => "ALLOCATION_ZERO_AMOUNT",
            Self::ImportDuplicateRow => "IMPORT_DUPLICATE_ROW",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, Value>>,
}

impl ValidationError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            field: None,
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Error attached to a specific field path
    pub fn on(field: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach one detail entry
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Prefix the field path, e.g. `items.pool1.amount` → `sourceAllocation.items.pool1.amount`
    pub fn nested_under(mut self, prefix: &str) -> Self {
        self.field = Some(match self.field.take() {
            Some(field) => format!("{}.{}", prefix, field),
            None => prefix.to_string(),
        });
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "[{}] {}: {}", self.code, field, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

/// A non-blocking observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: WarningCode,
    pub message: String,
}

impl ValidationWarning {
    pub fn on(field: impl Into<String>, code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            code,
            message: message.into(),
        }
    }
}

/// Outcome of one validation call
///
/// `is_valid` is true exactly when `errors` is empty; warnings never affect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ValidationWarning>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

impl ValidationResult {
    /// A passing result with nothing to report
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Build a result from collected errors
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings: Vec::new(),
        }
    }

    /// Record an error
    pub fn push_error(&mut self, error: ValidationError) {
        self.errors.push(error);
        self.is_valid = false;
    }

    /// Record a warning
    pub fn push_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Builder-style error append
    pub fn with_error(mut self, error: ValidationError) -> Self {
        self.push_error(error);
        self
    }

    /// Fold another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.is_valid = self.is_valid && other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Fold another result in, prefixing its field paths
    pub fn merge_nested(&mut self, prefix: &str, other: ValidationResult) {
        self.is_valid = self.is_valid && other.is_valid;
        self.errors
            .extend(other.errors.into_iter().map(|e| e.nested_under(prefix)));
        self.warnings.extend(other.warnings.into_iter().map(|mut w| {
            w.field = Some(match w.field.take() {
                Some(field) => format!("{}.{}", prefix, field),
                None => prefix.to_string(),
            });
            w
        }));
    }

    /// Codes of all errors, in order
    pub fn error_codes(&self) -> Vec<ErrorCode> {
        self.errors.iter().map(|e| e.code).collect()
    }

    /// Whether any error carries `code`
    pub fn has_error(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Whether any error carries `code` on exactly `field`
    pub fn has_error_on(&self, field: &str, code: ErrorCode) -> bool {
        self.errors
            .iter()
            .any(|e| e.code == code && e.field.as_deref() == Some(field))
    }
}
