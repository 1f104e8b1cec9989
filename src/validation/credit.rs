//! Credit-card payoff checks

use std::collections::HashMap;

use super::result::{ErrorCode, ValidationError, ValidationResult};
use super::Validator;
use crate::models::{AllocationBreakdown, PoolId, Transaction, TransactionKind};

impl Validator {
    /// Validate a transfer that pays down credit debt
    ///
    /// Runs the full transfer validation, then requires the payment to be
    /// funded from at least one pool.
    pub fn validate_credit_payment(&self, transaction: &Transaction) -> ValidationResult {
        let mut result = self.validate_transfer_transaction(transaction);

        if let TransactionKind::Transfer {
            source_allocation, ..
        } = &transaction.kind
        {
            if source_allocation.items.is_empty() {
                result.push_error(ValidationError::on(
                    "sourceAllocation.items",
                    ErrorCode::CreditPaymentInvalidSource,
                    "Credit payment must draw from at least one pool",
                ));
            }
        }

        result
    }

    /// Maximum amount payable toward credit debt from the given pools
    ///
    /// Each source pool contributes `max(0, min(available, debt))`, capped by
    /// its own balance and its own debt; contributions are summed. Pools
    /// missing from either map contribute nothing.
    pub fn calculate_max_credit_payment(
        &self,
        source_allocation: &AllocationBreakdown,
        available_balances: &HashMap<PoolId, f64>,
        credit_debt: &HashMap<PoolId, f64>,
    ) -> f64 {
        source_allocation
            .items
            .iter()
            .map(|item| {
                let available = available_balances.get(&item.pool_id).copied().unwrap_or(0.0);
                let debt = credit_debt.get(&item.pool_id).copied().unwrap_or(0.0);
                available.min(debt).max(0.0)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::test_support::{breakdown, past, validator};

    fn balances(entries: &[(&str, f64)]) -> HashMap<PoolId, f64> {
        entries
            .iter()
            .map(|(pool, amount)| (PoolId::new(*pool), *amount))
            .collect()
    }

    #[test]
    fn test_max_payment_is_per_pool_min_sum() {
        let source = breakdown(&[("pool1", 200.0), ("pool2", 100.0)], 300.0);
        let available = balances(&[("pool1", 300.0), ("pool2", 50.0)]);
        let debt = balances(&[("pool1", 150.0), ("pool2", 80.0)]);

        let max = validator().calculate_max_credit_payment(&source, &available, &debt);
        assert_eq!(max, 200.0);
    }

    #[test]
    fn test_max_payment_missing_pools_contribute_zero() {
        let source = breakdown(&[("pool1", 10.0), ("pool2", 10.0), ("pool3", 10.0)], 30.0);
        let available = balances(&[("pool1", 40.0), ("pool2", 25.0)]);
        let debt = balances(&[("pool1", 15.0), ("pool3", 90.0)]);

        let max = validator().calculate_max_credit_payment(&source, &available, &debt);
        assert_eq!(max, 15.0);
    }

    #[test]
    fn test_max_payment_negative_balance_clamps_to_zero() {
        let source = breakdown(&[("pool1", 10.0)], 10.0);
        let available = balances(&[("pool1", -40.0)]);
        let debt = balances(&[("pool1", 100.0)]);

        let max = validator().calculate_max_credit_payment(&source, &available, &debt);
        assert_eq!(max, 0.0);
    }

    #[test]
    fn test_valid_credit_payment() {
        let t = Transaction::transfer(
            "checking",
            "visa",
            120.0,
            breakdown(&[("pool1", 120.0)], 120.0),
            breakdown(&[("pool1", 120.0)], 120.0),
        )
        .on(past());
        assert!(validator().validate_credit_payment(&t).is_valid);
    }

    #[test]
    fn test_credit_payment_without_source_pools() {
        let t = Transaction::transfer(
            "checking",
            "visa",
            120.0,
            breakdown(&[], 120.0),
            breakdown(&[("pool1", 120.0)], 120.0),
        )
        .on(past());
        let result = validator().validate_credit_payment(&t);
        assert!(result.has_error_on(
            "sourceAllocation.items",
            ErrorCode::CreditPaymentInvalidSource
        ));
    }
}
