//! Balance consistency checks
//!
//! Balances are supplied, not derived. These checks only look at the signs
//! of the amounts and at expected-vs-actual agreement.

use std::collections::HashMap;

use super::result::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use super::Validator;
use crate::models::{BalanceSnapshot, ChannelId, ChannelType, CurrentBalance, PoolBalance, PoolId};

impl Validator {
    /// Flag malformed and negative pool balances
    ///
    /// Every negative amount is an error here, including on credit channels;
    /// use [`Validator::validate_balance_consistency_with_channels`] to take
    /// channel types into account.
    pub fn validate_balance_consistency(&self, balances: &[PoolBalance]) -> ValidationResult {
        self.check_balances(balances, None)
    }

    /// Like [`Validator::validate_balance_consistency`], but negative balances on
    /// credit channels become warnings when the validator is configured to do so
    pub fn validate_balance_consistency_with_channels(
        &self,
        balances: &[PoolBalance],
        channel_types: &HashMap<ChannelId, ChannelType>,
    ) -> ValidationResult {
        self.check_balances(balances, Some(channel_types))
    }

    /// Compare an expected pool/channel balance against the actual one
    pub fn validate_pool_channel_balance(
        &self,
        pool_id: &PoolId,
        channel_id: &ChannelId,
        expected: f64,
        actual: f64,
    ) -> ValidationResult {
        if self.tolerances.amounts_match(expected, actual) {
            return ValidationResult::valid();
        }

        ValidationResult::from_errors(vec![ValidationError::on(
            format!("balances.{}.{}", pool_id, channel_id),
            ErrorCode::BalanceInconsistent,
            format!(
                "Pool {} in channel {} should hold {:.2} but holds {:.2}",
                pool_id, channel_id, expected, actual
            ),
        )
        .with_detail("expected", expected)
        .with_detail("actual", actual)
        .with_detail("difference", actual - expected)])
    }

    /// Validate the live balance state of a budget
    pub fn validate_current_balance(&self, current: &CurrentBalance) -> ValidationResult {
        if let Some(err) = self.shape_error(current) {
            return ValidationResult::from_errors(vec![err]);
        }
        self.validate_balance_consistency(&current.balances)
    }

    /// Validate a point-in-time balance snapshot
    pub fn validate_balance_snapshot(&self, snapshot: &BalanceSnapshot) -> ValidationResult {
        if let Some(err) = self.shape_error(snapshot) {
            return ValidationResult::from_errors(vec![err]);
        }

        let mut result = self.validate_balance_consistency(&snapshot.balances);
        if snapshot.snapshot_date > self.now() {
            result.push_error(
                ValidationError::on(
                    "snapshotDate",
                    ErrorCode::TransactionDateInvalid,
                    "Snapshot date cannot be in the future",
                )
                .with_detail("snapshotDate", snapshot.snapshot_date.to_rfc3339()),
            );
        }
        result
    }

    fn check_balances(
        &self,
        balances: &[PoolBalance],
        channel_types: Option<&HashMap<ChannelId, ChannelType>>,
    ) -> ValidationResult {
        let mut result = ValidationResult::valid();

        for (idx, balance) in balances.iter().enumerate() {
            let field = format!("balances.{}", idx);

            // A malformed entry doesn't stop the rest of the batch
            if let Some(err) = self.shape_error(balance) {
                result.push_error(err.nested_under(&field));
                continue;
            }

            if balance.amount >= 0.0 {
                continue;
            }

            let on_credit = self.credit_negative_as_warning
                && channel_types
                    .and_then(|types| types.get(&balance.channel_id))
                    .is_some_and(|t| t.is_liability());

            if on_credit {
                result.push_warning(ValidationWarning::on(
                    format!("{}.amount", field),
                    WarningCode::BalanceNegativeCredit,
                    format!(
                        "Pool {} carries {:.2} of credit in channel {}",
                        balance.pool_id, balance.amount, balance.channel_id
                    ),
                ));
            } else {
                result.push_error(
                    ValidationError::on(
                        format!("{}.amount", field),
                        ErrorCode::BalanceNegative,
                        format!(
                            "Pool {} has a negative balance of {:.2} in channel {}",
                            balance.pool_id, balance.amount, balance.channel_id
                        ),
                    )
                    .with_detail("poolId", balance.pool_id.as_str())
                    .with_detail("channelId", balance.channel_id.as_str())
                    .with_detail("amount", balance.amount),
                );
            }
        }

        tracing::debug!(
            balances = balances.len(),
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "checked balance consistency"
        );
        result
    }
}
