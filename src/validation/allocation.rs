//! Allocation validation
//!
//! Breakdowns and strategies get a shape check first. A shape failure ends the
//! call with a single `SCHEMA_VALIDATION_FAILED` error; otherwise every
//! remaining check runs and all violations are collected.

use serde_json::json;

use super::result::{
    ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
use super::Validator;
use crate::models::{AllocationBreakdown, AllocationStrategy, PoolId};

impl Validator {
    /// Validate a per-transaction allocation breakdown
    pub fn validate_allocation_breakdown(&self, breakdown: &AllocationBreakdown) -> ValidationResult {
        if let Some(err) = self.shape_error(breakdown) {
            return ValidationResult::from_errors(vec![err]);
        }

        let mut result = ValidationResult::valid();

        for item in &breakdown.items {
            let field = format!("items.{}.amount", item.pool_id);
            if item.amount < 0.0 {
                result.push_error(
                    ValidationError::on(
                        field,
                        ErrorCode::AllocationNegativeAmount,
                        format!("Allocation to pool {} cannot be negative", item.pool_id),
                    )
                    .with_detail("amount", item.amount),
                );
            } else if item.amount == 0.0 {
                result.push_warning(ValidationWarning::on(
                    field,
                    WarningCode::AllocationZeroAmount,
                    format!("Allocation to pool {} is zero", item.pool_id),
                ));
            }
        }

        if breakdown.total_amount <= 0.0 {
            result.push_error(
                ValidationError::on(
                    "totalAmount",
                    ErrorCode::AllocationNegativeAmount,
                    "Allocation total must be greater than zero",
                )
                .with_detail("totalAmount", breakdown.total_amount),
            );
        }

        tracing::trace!(
            items = breakdown.items.len(),
            errors = result.errors.len(),
            "validated allocation breakdown"
        );
        result
    }

    /// Validate a standing proportional allocation strategy
    pub fn validate_allocation_strategy(&self, strategy: &AllocationStrategy) -> ValidationResult {
        if let Some(err) = self.shape_error(strategy) {
            return ValidationResult::from_errors(vec![err]);
        }

        let mut result = ValidationResult::valid();

        if strategy.allocations.is_empty() {
            result.push_error(ValidationError::on(
                "allocations",
                ErrorCode::AllocationEmpty,
                "Strategy must allocate to at least one pool",
            ));
        }

        for pool_id in strategy.duplicate_pool_ids() {
            result.push_error(
                ValidationError::on(
                    "allocations",
                    ErrorCode::AllocationDuplicatePool,
                    format!("Pool {} appears more than once", pool_id),
                )
                .with_detail("poolId", pool_id.as_str()),
            );
        }

        let total = strategy.proportion_total();
        if !self.tolerances.proportions_complete(total) {
            result.push_error(
                ValidationError::on(
                    "allocations",
                    ErrorCode::AllocationSumInvalid,
                    format!("Proportions must sum to 1.0, got {}", total),
                )
                .with_detail("total", total)
                .with_detail("expected", 1.0),
            );
        }

        for allocation in &strategy.allocations {
            let field = format!("allocations.{}.proportion", allocation.pool_id);
            if allocation.proportion < 0.0 {
                result.push_error(
                    ValidationError::on(
                        field,
                        ErrorCode::AllocationNegativeAmount,
                        format!("Proportion for pool {} cannot be negative", allocation.pool_id),
                    )
                    .with_detail("proportion", allocation.proportion),
                );
            } else if allocation.proportion > 1.0 {
                result.push_error(
                    ValidationError::on(
                        field,
                        ErrorCode::AllocationSumInvalid,
                        format!("Proportion for pool {} exceeds 1.0", allocation.pool_id),
                    )
                    .with_detail("proportion", allocation.proportion),
                );
            }
        }

        tracing::trace!(
            allocations = strategy.allocations.len(),
            errors = result.errors.len(),
            "validated allocation strategy"
        );
        result
    }

    /// Validate moving `amount` into a pool that has `available_balance`
    pub fn validate_pool_allocation(
        &self,
        pool_id: &PoolId,
        amount: f64,
        available_balance: f64,
    ) -> ValidationResult {
        let mut result = ValidationResult::valid();
        let field = format!("pools.{}.amount", pool_id);

        if amount < 0.0 {
            result.push_error(ValidationError::on(
                field.clone(),
                ErrorCode::AllocationNegativeAmount,
                format!("Allocation to pool {} cannot be negative", pool_id),
            ));
        }

        if amount > available_balance + self.tolerances.amount {
            result.push_error(
                ValidationError::on(
                    field,
                    ErrorCode::AllocationExceedsBalance,
                    format!(
                        "Allocation of {:.2} exceeds available balance {:.2} in pool {}",
                        amount, available_balance, pool_id
                    ),
                )
                .with_detail("requested", json!(amount))
                .with_detail("available", json!(available_balance)),
            );
        }

        result
    }
}
