//! Transaction validation
//!
//! Unlike allocations, a transaction's shape failure is appended rather than
//! terminal: the base checks and allocation reconciliation still run so the
//! caller gets the complete list in one pass. The one exception is a call
//! with the wrong variant, where there is no payload to check.

use super::result::{ErrorCode, ValidationError, ValidationResult};
use super::Validator;
use crate::models::{AllocationBreakdown, Transaction, TransactionKind, TransactionType};

impl Validator {
    /// Structural checks shared by every transaction variant
    pub fn validate_transaction(&self, transaction: &Transaction) -> ValidationResult {
        let mut result = ValidationResult::valid();

        if let Some(notes) = &transaction.notes {
            if notes.trim().is_empty() {
                result.push_error(ValidationError::on(
                    "notes",
                    ErrorCode::TransactionDescriptionEmpty,
                    "Transaction description cannot be empty",
                ));
            }
        }

        if !(transaction.amount.is_finite() && transaction.amount > 0.0) {
            result.push_error(
                ValidationError::on(
                    "amount",
                    ErrorCode::TransactionAmountInvalid,
                    "Transaction amount must be greater than zero",
                )
                .with_detail("amount", transaction.amount),
            );
        }

        match transaction.date {
            None => result.push_error(ValidationError::on(
                "date",
                ErrorCode::TransactionDateInvalid,
                "Transaction date is required",
            )),
            Some(date) if date > self.now() => result.push_error(
                ValidationError::on(
                    "date",
                    ErrorCode::TransactionDateInvalid,
                    "Transaction date cannot be in the future",
                )
                .with_detail("date", date.to_rfc3339()),
            ),
            Some(_) => {}
        }

        result
    }

    /// Validate an income transaction
    pub fn validate_income_transaction(&self, transaction: &Transaction) -> ValidationResult {
        match &transaction.kind {
            TransactionKind::Income {
                allocation_breakdown,
                ..
            } => self.validate_single_channel(transaction, allocation_breakdown),
            _ => wrong_variant(transaction, TransactionType::Income),
        }
    }

    /// Validate an expense transaction
    pub fn validate_expense_transaction(&self, transaction: &Transaction) -> ValidationResult {
        match &transaction.kind {
            TransactionKind::Expense {
                allocation_breakdown,
                ..
            } => self.validate_single_channel(transaction, allocation_breakdown),
            _ => wrong_variant(transaction, TransactionType::Expense),
        }
    }

    /// Validate a transfer between channels and/or pools
    pub fn validate_transfer_transaction(&self, transaction: &Transaction) -> ValidationResult {
        let TransactionKind::Transfer {
            source_channel_id,
            destination_channel_id,
            source_allocation,
            destination_allocation,
        } = &transaction.kind
        else {
            return wrong_variant(transaction, TransactionType::Transfer);
        };

        let mut result = ValidationResult::valid();
        if let Some(err) = self.shape_error(transaction) {
            result.push_error(err);
        }
        result.merge(self.validate_transaction(transaction));

        // Same channel is fine as long as money actually changes pools
        if source_channel_id == destination_channel_id
            && source_allocation.pool_ids() == destination_allocation.pool_ids()
        {
            result.push_error(
                ValidationError::new(
                    ErrorCode::DataIntegrityInvalidState,
                    "Transfer within the same channel must move money between different pools",
                )
                .with_detail("channelId", source_channel_id.as_str()),
            );
        }

        for (field, allocation) in [
            ("sourceAllocation", source_allocation),
            ("destinationAllocation", destination_allocation),
        ] {
            self.reconcile_allocation(&mut result, field, allocation, transaction.amount);
            result.merge_nested(field, self.validate_allocation_breakdown(allocation));
        }

        tracing::debug!(
            transaction = %transaction.id,
            errors = result.errors.len(),
            "validated transfer"
        );
        result
    }

    /// Validate any transaction by dispatching on its variant
    pub fn validate_any_transaction(&self, transaction: &Transaction) -> ValidationResult {
        match transaction.transaction_type() {
            TransactionType::Income => self.validate_income_transaction(transaction),
            TransactionType::Expense => self.validate_expense_transaction(transaction),
            TransactionType::Transfer => self.validate_transfer_transaction(transaction),
        }
    }

    fn validate_single_channel(
        &self,
        transaction: &Transaction,
        breakdown: &AllocationBreakdown,
    ) -> ValidationResult {
        let mut result = ValidationResult::valid();
        if let Some(err) = self.shape_error(transaction) {
            result.push_error(err);
        }
        result.merge(self.validate_transaction(transaction));

        self.reconcile_allocation(&mut result, "allocationBreakdown", breakdown, transaction.amount);
        result.merge_nested(
            "allocationBreakdown",
            self.validate_allocation_breakdown(breakdown),
        );

        tracing::debug!(
            transaction = %transaction.id,
            kind = %transaction.transaction_type(),
            errors = result.errors.len(),
            "validated transaction"
        );
        result
    }

    fn reconcile_allocation(
        &self,
        result: &mut ValidationResult,
        field: &str,
        allocation: &AllocationBreakdown,
        amount: f64,
    ) {
        if !self.tolerances.amounts_match(allocation.total_amount, amount) {
            result.push_error(
                ValidationError::on(
                    format!("{}.totalAmount", field),
                    ErrorCode::TransactionAllocationMismatch,
                    format!(
                        "Allocated total {:.2} does not match transaction amount {:.2}",
                        allocation.total_amount, amount
                    ),
                )
                .with_detail("allocated", allocation.total_amount)
                .with_detail("amount", amount),
            );
        }
    }
}

fn wrong_variant(transaction: &Transaction, expected: TransactionType) -> ValidationResult {
    ValidationResult::from_errors(vec![ValidationError::on(
        "type",
        ErrorCode::SchemaValidationFailed,
        format!(
            "Expected a {} transaction, got {}",
            expected,
            transaction.transaction_type()
        ),
    )
    .with_detail("expected", expected.to_string())
    .with_detail("actual", transaction.transaction_type().to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::test_support::{breakdown, future, past, validator};

    fn income(amount: f64, items: &[(&str, f64)], total: f64) -> Transaction {
        Transaction::income("checking", amount, "Salary", breakdown(items, total)).on(past())
    }

    fn transfer(
        source_channel: &str,
        destination_channel: &str,
        source: &[(&str, f64)],
        destination: &[(&str, f64)],
    ) -> Transaction {
        let amount: f64 = source.iter().map(|(_, a)| a).sum();
        Transaction::transfer(
            source_channel,
            destination_channel,
            amount,
            breakdown(source, amount),
            breakdown(destination, destination.iter().map(|(_, a)| a).sum()),
        )
        .on(past())
        .with_notes("Move money")
    }

    #[test]
    fn test_valid_income() {
        let t = income(150.0, &[("pool1", 100.0), ("pool2", 50.0)], 150.0);
        let result = validator().validate_income_transaction(&t);
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_valid_expense() {
        let t = Transaction::expense("checking", 42.5, "Groceries", breakdown(&[("pool1", 42.5)], 42.5))
            .on(past())
            .with_notes("Weekly shop");
        assert!(validator().validate_expense_transaction(&t).is_valid);
    }

    #[test]
    fn test_base_checks_accumulate() {
        let t = Transaction::expense("checking", 0.0, "Groceries", breakdown(&[("pool1", 10.0)], 10.0))
            .on(future())
            .with_notes("   ");
        let result = validator().validate_transaction(&t);
        assert_eq!(
            result.error_codes(),
            vec![
                ErrorCode::TransactionDescriptionEmpty,
                ErrorCode::TransactionAmountInvalid,
                ErrorCode::TransactionDateInvalid,
            ]
        );
    }

    #[test]
    fn test_missing_date() {
        let mut t = income(10.0, &[("pool1", 10.0)], 10.0);
        t.date = None;
        let result = validator().validate_transaction(&t);
        assert!(result.has_error_on("date", ErrorCode::TransactionDateInvalid));
    }

    #[test]
    fn test_nan_amount_is_invalid() {
        let t = income(f64::NAN, &[("pool1", 10.0)], 10.0);
        let result = validator().validate_transaction(&t);
        assert!(result.has_error_on("amount", ErrorCode::TransactionAmountInvalid));
    }

    #[test]
    fn test_allocation_mismatch() {
        let t = income(200.0, &[("pool1", 100.0), ("pool2", 50.0)], 150.0);
        let result = validator().validate_income_transaction(&t);
        assert_eq!(
            result.error_codes(),
            vec![ErrorCode::TransactionAllocationMismatch]
        );
        assert_eq!(
            result.errors[0].field.as_deref(),
            Some("allocationBreakdown.totalAmount")
        );
    }

    #[test]
    fn test_nested_breakdown_errors_are_prefixed() {
        let t = income(50.0, &[("pool1", -50.0), ("pool2", 100.0)], 50.0);
        let result = validator().validate_income_transaction(&t);
        assert!(result.has_error_on(
            "allocationBreakdown.items.pool1.amount",
            ErrorCode::AllocationNegativeAmount
        ));
    }

    #[test]
    fn test_shape_failure_is_appended_not_terminal() {
        let t = Transaction::income("", 0.0, "Salary", breakdown(&[("pool1", 10.0)], 10.0)).on(past());
        let result = validator().validate_income_transaction(&t);
        assert!(result.has_error(ErrorCode::SchemaValidationFailed));
        assert!(result.has_error(ErrorCode::TransactionAmountInvalid));
        assert!(result.has_error(ErrorCode::TransactionAllocationMismatch));
    }

    #[test]
    fn test_wrong_variant() {
        let t = income(10.0, &[("pool1", 10.0)], 10.0);
        let result = validator().validate_transfer_transaction(&t);
        assert_eq!(result.error_codes(), vec![ErrorCode::SchemaValidationFailed]);
        assert_eq!(result.errors[0].field.as_deref(), Some("type"));
    }

    #[test]
    fn test_self_transfer_with_same_pools_rejected() {
        let t = transfer(
            "checking",
            "checking",
            &[("pool1", 60.0), ("pool2", 40.0)],
            &[("pool2", 30.0), ("pool1", 70.0)],
        );
        let result = validator().validate_transfer_transaction(&t);
        assert_eq!(result.error_codes(), vec![ErrorCode::DataIntegrityInvalidState]);
    }

    #[test]
    fn test_same_channel_between_pools_allowed() {
        let t = transfer("checking", "checking", &[("pool1", 100.0)], &[("pool2", 100.0)]);
        let result = validator().validate_transfer_transaction(&t);
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_cross_channel_same_pools_allowed() {
        let t = transfer("checking", "savings", &[("pool1", 100.0)], &[("pool1", 100.0)]);
        assert!(validator().validate_transfer_transaction(&t).is_valid);
    }

    #[test]
    fn test_transfer_reconciles_both_sides() {
        let t = transfer("checking", "savings", &[("pool1", 100.0)], &[("pool2", 80.0)]);
        let result = validator().validate_transfer_transaction(&t);
        assert_eq!(
            result.error_codes(),
            vec![ErrorCode::TransactionAllocationMismatch]
        );
        assert!(result.has_error_on(
            "destinationAllocation.totalAmount",
            ErrorCode::TransactionAllocationMismatch
        ));
    }

    #[test]
    fn test_dispatch() {
        let t = transfer("checking", "checking", &[("pool1", 10.0)], &[("pool1", 10.0)]);
        let result = validator().validate_any_transaction(&t);
        assert!(result.has_error(ErrorCode::DataIntegrityInvalidState));
    }
}
