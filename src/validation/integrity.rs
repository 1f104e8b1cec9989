//! Cross-entity referential integrity
//!
//! Two entry points share one membership walk but report different codes:
//! the bulk budget check emits `DATA_INTEGRITY_ORPHANED_REFERENCE`, while the
//! single-transaction check against caller-supplied id sets emits
//! `TRANSACTION_CHANNEL_NOT_FOUND` / `TRANSACTION_POOL_NOT_FOUND`.
//! All lookups go through hash sets so a whole budget is checked in one
//! near-linear pass.

use std::collections::HashSet;

use super::result::{ErrorCode, ValidationError, ValidationResult};
use super::Validator;
use crate::models::{
    AllocationStrategy, Budget, Channel, ChannelId, Pool, PoolId, Transaction,
};

/// What kind of entity a dangling reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReferenceKind {
    Channel,
    Pool,
}

/// A reference from a transaction to an id that isn't in the known set
#[derive(Debug)]
struct MissingReference<'a> {
    kind: ReferenceKind,
    field: String,
    id: &'a str,
}

/// Walk every channel and pool reference in `transaction`
fn missing_references<'a>(
    transaction: &'a Transaction,
    has_channel: impl Fn(&ChannelId) -> bool,
    has_pool: impl Fn(&PoolId) -> bool,
) -> Vec<MissingReference<'a>> {
    let mut missing = Vec::new();

    let channel_fields: &[&str] = if transaction.is_transfer() {
        &["sourceChannelId", "destinationChannelId"]
    } else {
        &["channelId"]
    };
    for (field, channel_id) in channel_fields.iter().zip(transaction.channel_ids()) {
        if !has_channel(channel_id) {
            missing.push(MissingReference {
                kind: ReferenceKind::Channel,
                field: (*field).to_string(),
                id: channel_id.as_str(),
            });
        }
    }

    for (field, allocation) in transaction.allocations() {
        for item in &allocation.items {
            if !has_pool(&item.pool_id) {
                missing.push(MissingReference {
                    kind: ReferenceKind::Pool,
                    field: format!("{}.items.{}.poolId", field, item.pool_id),
                    id: item.pool_id.as_str(),
                });
            }
        }
    }

    missing
}

impl Validator {
    /// Check every reference in a budget against its active pools and channels
    pub fn validate_budget_integrity(
        &self,
        pools: &[Pool],
        channels: &[Channel],
        transactions: &[Transaction],
        strategies: &[AllocationStrategy],
    ) -> ValidationResult {
        let active_pools: HashSet<&PoolId> =
            pools.iter().filter(|p| p.is_active).map(|p| &p.id).collect();
        let active_channels: HashSet<&ChannelId> = channels
            .iter()
            .filter(|c| c.is_active)
            .map(|c| &c.id)
            .collect();

        let mut result = ValidationResult::valid();

        for transaction in transactions {
            let missing = missing_references(
                transaction,
                |id| active_channels.contains(id),
                |id| active_pools.contains(id),
            );
            for reference in missing {
                let noun = match reference.kind {
                    ReferenceKind::Channel => "channel",
                    ReferenceKind::Pool => "pool",
                };
                result.push_error(
                    ValidationError::on(
                        format!("transactions.{}.{}", transaction.id, reference.field),
                        ErrorCode::DataIntegrityOrphanedReference,
                        format!(
                            "Transaction {} references missing or inactive {} {}",
                            transaction.id, noun, reference.id
                        ),
                    )
                    .with_detail("transactionId", transaction.id.as_str())
                    .with_detail(format!("{}Id", noun), reference.id),
                );
            }
        }

        for strategy in strategies.iter().filter(|s| s.is_active) {
            for allocation in &strategy.allocations {
                if !active_pools.contains(&allocation.pool_id) {
                    result.push_error(
                        ValidationError::on(
                            format!("strategies.{}.allocations.{}", strategy.id, allocation.pool_id),
                            ErrorCode::DataIntegrityOrphanedReference,
                            format!(
                                "Strategy {} allocates to missing or inactive pool {}",
                                strategy.id, allocation.pool_id
                            ),
                        )
                        .with_detail("strategyId", strategy.id.as_str())
                        .with_detail("poolId", allocation.pool_id.as_str()),
                    );
                }
            }
        }

        tracing::debug!(
            pools = active_pools.len(),
            channels = active_channels.len(),
            transactions = transactions.len(),
            strategies = strategies.len(),
            orphaned = result.errors.len(),
            "checked budget integrity"
        );
        result
    }

    /// Check one transaction's references against caller-supplied id sets
    pub fn validate_transaction_integrity(
        &self,
        transaction: &Transaction,
        existing_pool_ids: &HashSet<PoolId>,
        existing_channel_ids: &HashSet<ChannelId>,
    ) -> ValidationResult {
        let missing = missing_references(
            transaction,
            |id| existing_channel_ids.contains(id),
            |id| existing_pool_ids.contains(id),
        );

        let errors = missing
            .into_iter()
            .map(|reference| match reference.kind {
                ReferenceKind::Channel => ValidationError::on(
                    reference.field,
                    ErrorCode::TransactionChannelNotFound,
                    format!("Channel {} not found", reference.id),
                )
                .with_detail("channelId", reference.id),
                ReferenceKind::Pool => ValidationError::on(
                    reference.field,
                    ErrorCode::TransactionPoolNotFound,
                    format!("Pool {} not found", reference.id),
                )
                .with_detail("poolId", reference.id),
            })
            .collect();

        ValidationResult::from_errors(errors)
    }

    /// Run every applicable check over a whole budget document
    ///
    /// Combines referential integrity, per-transaction validation, strategy
    /// validation, and current-balance validation into one result. Nested
    /// field paths are prefixed with the entity they came from.
    pub fn validate_budget(&self, budget: &Budget) -> ValidationResult {
        let mut result = self.validate_budget_integrity(
            &budget.pools,
            &budget.channels,
            &budget.transactions,
            &budget.strategies,
        );

        for transaction in &budget.transactions {
            result.merge_nested(
                &format!("transactions.{}", transaction.id),
                self.validate_any_transaction(transaction),
            );
        }

        for strategy in &budget.strategies {
            result.merge_nested(
                &format!("strategies.{}", strategy.id),
                self.validate_allocation_strategy(strategy),
            );
        }

        if let Some(current) = &budget.current_balance {
            let balances = if self.credit_negative_as_warning {
                match self.shape_error(current) {
                    Some(err) => ValidationResult::from_errors(vec![err]),
                    None => self.validate_balance_consistency_with_channels(
                        &current.balances,
                        &budget.channel_types(),
                    ),
                }
            } else {
                self.validate_current_balance(current)
            };
            result.merge_nested("currentBalance", balances);
        }

        tracing::info!(
            transactions = budget.transactions.len(),
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "validated budget"
        );
        result
    }
}
