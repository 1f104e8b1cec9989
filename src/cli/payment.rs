//! CLI command handler for credit payoff limits

use serde::Serialize;
use std::path::Path;

use super::{render, OutputFormat};
use crate::error::{PoolkeeperError, PoolkeeperResult};
use crate::models::{round_cents, Budget, TransactionKind};
use crate::validation::Validator;

/// Result of a max-payment query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxPayment {
    pub transaction_id: String,
    pub requested: f64,
    pub max_payment: f64,
}

impl MaxPayment {
    pub fn exceeds_limit(&self, validator: &Validator) -> bool {
        self.requested - self.max_payment > validator.tolerances().amount
    }
}

/// Compute the largest payment the transfer's source pools could cover
pub fn max_payment_for_transfer(
    validator: &Validator,
    budget: &Budget,
    transfer_id: &str,
) -> PoolkeeperResult<MaxPayment> {
    let transaction = budget
        .find_transaction(transfer_id)
        .ok_or_else(|| PoolkeeperError::transaction_not_found(transfer_id))?;

    let TransactionKind::Transfer {
        source_allocation, ..
    } = &transaction.kind
    else {
        return Err(PoolkeeperError::Validation(format!(
            "Transaction {} is a {}, not a transfer",
            transfer_id,
            transaction.transaction_type()
        )));
    };

    let max_payment = validator.calculate_max_credit_payment(
        source_allocation,
        &budget.available_by_pool(),
        &budget.credit_debts,
    );

    Ok(MaxPayment {
        transaction_id: transaction.id.to_string(),
        requested: transaction.amount,
        max_payment: round_cents(max_payment),
    })
}

/// Handle the max-payment command. Returns `false` when the transfer asks
/// for more than can be paid.
pub fn handle_max_payment_command(
    validator: &Validator,
    file: &Path,
    transfer_id: &str,
    format: OutputFormat,
) -> PoolkeeperResult<bool> {
    let budget = Budget::load(file)?;
    let payment = max_payment_for_transfer(validator, &budget, transfer_id)?;
    let within_limit = !payment.exceeds_limit(validator);

    match render(format, &payment)? {
        Some(rendered) => println!("{}", rendered),
        None => {
            println!("Credit payment for {}", payment.transaction_id);
            println!("  Requested:    {:.2}", payment.requested);
            println!("  Max payable:  {:.2}", payment.max_payment);
            if !within_limit {
                println!(
                    "  Over limit by {:.2}",
                    payment.requested - payment.max_payment
                );
            }
        }
    }

    Ok(within_limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AllocationBreakdown, AllocationItem, CurrentBalance, PoolBalance, PoolId, Transaction,
        TransactionId,
    };

    fn budget() -> Budget {
        let source = AllocationBreakdown::new(
            vec![
                AllocationItem::new("pool1", 200.0),
                AllocationItem::new("pool2", 100.0),
            ],
            300.0,
        );
        let destination =
            AllocationBreakdown::new(vec![AllocationItem::new("credit-pool", 300.0)], 300.0);

        let mut transfer = Transaction::transfer("ch1", "card", 300.0, source, destination);
        transfer.id = TransactionId::new("t1");
        let mut income = Transaction::income(
            "ch1",
            50.0,
            "Salary",
            AllocationBreakdown::new(vec![AllocationItem::new("pool1", 50.0)], 50.0),
        );
        income.id = TransactionId::new("t2");

        let mut budget = Budget {
            transactions: vec![transfer, income],
            current_balance: Some(CurrentBalance::new(vec![
                PoolBalance::new("pool1", "ch1", 150.0),
                PoolBalance::new("pool1", "ch2", 150.0),
                PoolBalance::new("pool2", "ch1", 50.0),
            ])),
            ..Default::default()
        };
        budget.credit_debts.insert(PoolId::new("pool1"), 150.0);
        budget.credit_debts.insert(PoolId::new("pool2"), 100.0);
        budget
    }

    #[test]
    fn test_max_payment_uses_pool_totals() {
        let payment = max_payment_for_transfer(&Validator::default(), &budget(), "t1").unwrap();
        // pool1: min(300, 150) + pool2: min(50, 100)
        assert_eq!(payment.max_payment, 200.0);
        assert!(payment.exceeds_limit(&Validator::default()));
    }

    #[test]
    fn test_max_payment_requires_transfer() {
        let err = max_payment_for_transfer(&Validator::default(), &budget(), "t2").unwrap_err();
        assert!(matches!(err, PoolkeeperError::Validation(_)));
    }

    #[test]
    fn test_max_payment_unknown_transaction() {
        let err = max_payment_for_transfer(&Validator::default(), &budget(), "nope").unwrap_err();
        assert!(err.is_not_found());
    }
}
