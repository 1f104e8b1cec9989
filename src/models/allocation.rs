//! Allocation models
//!
//! An [`AllocationBreakdown`] splits one dollar amount across pools for a single
//! transaction. An [`AllocationStrategy`] is a standing rule describing how
//! future income should be divided proportionally.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ids::{BudgetId, PoolId, StrategyId};
use crate::error::{PoolkeeperError, PoolkeeperResult};

/// Round a dollar amount to whole cents
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// One pool's share of a breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationItem {
    pub pool_id: PoolId,
    pub amount: f64,
}

impl AllocationItem {
    pub fn new(pool_id: impl Into<PoolId>, amount: f64) -> Self {
        Self {
            pool_id: pool_id.into(),
            amount,
        }
    }
}

/// A per-transaction split of a dollar amount across pools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationBreakdown {
    pub items: Vec<AllocationItem>,
    pub total_amount: f64,
}

impl AllocationBreakdown {
    /// Create a breakdown from items and a declared total
    pub fn new(items: Vec<AllocationItem>, total_amount: f64) -> Self {
        Self {
            items,
            total_amount,
        }
    }

    /// Create a breakdown whose declared total is the sum of its items
    pub fn from_items(items: Vec<AllocationItem>) -> Self {
        let total_amount = items.iter().map(|i| i.amount).sum();
        Self {
            items,
            total_amount,
        }
    }

    /// Sum of all item amounts
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(|i| i.amount).sum()
    }

    /// The set of pools this breakdown touches
    pub fn pool_ids(&self) -> HashSet<&PoolId> {
        self.items.iter().map(|i| &i.pool_id).collect()
    }

    /// Pool ids that appear more than once, in first-repeat order
    pub fn duplicate_pool_ids(&self) -> Vec<&PoolId> {
        duplicates(self.items.iter().map(|i| &i.pool_id))
    }

    /// Rescale items proportionally so they sum to `target`
    ///
    /// Amounts are rounded to cents and the rounding remainder lands on the
    /// largest item, so the result sums to `target` exactly. Normalizing an
    /// already-normalized breakdown returns it unchanged.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if the items sum to exactly zero, since no
    /// proportion can be derived from them.
    pub fn normalize(&self, target: f64) -> PoolkeeperResult<Self> {
        let computed = self.items_total();
        if computed == 0.0 {
            return Err(PoolkeeperError::Allocation(
                "cannot normalize an allocation whose items total zero".into(),
            ));
        }

        let scale = target / computed;
        let mut items: Vec<AllocationItem> = self
            .items
            .iter()
            .map(|i| AllocationItem::new(i.pool_id.clone(), round_cents(i.amount * scale)))
            .collect();
        let weights: Vec<f64> = items.iter().map(|i| i.amount.abs()).collect();
        apply_remainder(&mut items, &weights, target);

        Ok(Self {
            items,
            total_amount: target,
        })
    }
}

/// A single pool's share of an allocation strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolAllocation {
    pub pool_id: PoolId,
    /// Fraction in `[0, 1]`
    pub proportion: f64,
}

impl PoolAllocation {
    pub fn new(pool_id: impl Into<PoolId>, proportion: f64) -> Self {
        Self {
            pool_id: pool_id.into(),
            proportion,
        }
    }
}

/// A standing rule for distributing income across pools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationStrategy {
    #[serde(default = "StrategyId::generate")]
    pub id: StrategyId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<BudgetId>,

    #[serde(default)]
    pub name: String,

    pub allocations: Vec<PoolAllocation>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl AllocationStrategy {
    /// Create an active strategy with a generated id
    pub fn new(allocations: Vec<PoolAllocation>) -> Self {
        Self {
            id: StrategyId::generate(),
            budget_id: None,
            name: String::new(),
            allocations,
            is_active: true,
        }
    }

    /// Builder-style deactivation
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Sum of all proportions
    pub fn proportion_total(&self) -> f64 {
        self.allocations.iter().map(|a| a.proportion).sum()
    }

    /// Pool ids that appear more than once, in first-repeat order
    pub fn duplicate_pool_ids(&self) -> Vec<&PoolId> {
        duplicates(self.allocations.iter().map(|a| &a.pool_id))
    }

    /// Split `amount` across pools according to this strategy
    ///
    /// Proportions are applied relative to their sum, amounts are rounded to
    /// cents, and the rounding remainder is assigned to the pool with the
    /// largest proportion. The resulting breakdown's items sum to `amount`.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if the strategy has no allocations or its
    /// proportions sum to zero or less.
    pub fn distribute(&self, amount: f64) -> PoolkeeperResult<AllocationBreakdown> {
        if self.allocations.is_empty() {
            return Err(PoolkeeperError::Allocation(
                "cannot distribute with an empty strategy".into(),
            ));
        }

        let total = self.proportion_total();
        if total <= 0.0 {
            return Err(PoolkeeperError::Allocation(format!(
                "cannot distribute with proportions totalling {}",
                total
            )));
        }

        let mut items: Vec<AllocationItem> = self
            .allocations
            .iter()
            .map(|a| AllocationItem::new(a.pool_id.clone(), round_cents(amount * a.proportion / total)))
            .collect();
        let weights: Vec<f64> = self.allocations.iter().map(|a| a.proportion).collect();
        apply_remainder(&mut items, &weights, amount);

        Ok(AllocationBreakdown::new(items, amount))
    }
}

/// Push the cent-rounding remainder onto the item with the largest weight
fn apply_remainder(items: &mut [AllocationItem], weights: &[f64], target: f64) {
    let assigned: f64 = items.iter().map(|i| i.amount).sum();
    let remainder = round_cents(target - assigned);
    if remainder.abs() < 0.005 {
        return;
    }

    let largest = weights
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (idx, &w)| match best {
            Some((_, bw)) if bw >= w => best,
            _ => Some((idx, w)),
        })
        .map(|(idx, _)| idx);

    if let Some(idx) = largest {
        items[idx].amount = round_cents(items[idx].amount + remainder);
    }
}

fn duplicates<'a>(ids: impl Iterator<Item = &'a PoolId>) -> Vec<&'a PoolId> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut out = Vec::new();
    for id in ids {
        if !seen.insert(id) && reported.insert(id) {
            out.push(id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(items: &[(&str, f64)], total: f64) -> AllocationBreakdown {
        AllocationBreakdown::new(
            items.iter().map(|(p, a)| AllocationItem::new(*p, *a)).collect(),
            total,
        )
    }

    #[test]
    fn test_items_total_and_pool_ids() {
        let b = breakdown(&[("pool1", 100.0), ("pool2", 50.0)], 150.0);
        assert_eq!(b.items_total(), 150.0);
        assert_eq!(b.pool_ids().len(), 2);
        assert!(b.duplicate_pool_ids().is_empty());
    }

    #[test]
    fn test_duplicate_pool_ids_reported_once() {
        let b = breakdown(&[("pool1", 1.0), ("pool1", 2.0), ("pool1", 3.0)], 6.0);
        let dups = b.duplicate_pool_ids();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].as_str(), "pool1");
    }

    #[test]
    fn test_normalize_scales_to_target() {
        let b = breakdown(&[("pool1", 2.0), ("pool2", 1.0)], 3.0);
        let n = b.normalize(90.0).unwrap();
        assert_eq!(n.items[0].amount, 60.0);
        assert_eq!(n.items[1].amount, 30.0);
        assert_eq!(n.total_amount, 90.0);
    }

    #[test]
    fn test_normalize_assigns_remainder_to_largest() {
        let b = breakdown(&[("pool1", 1.0), ("pool2", 1.0), ("pool3", 1.0)], 3.0);
        let n = b.normalize(100.0).unwrap();
        let sum: f64 = n.items.iter().map(|i| i.amount).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert_eq!(n.items[0].amount, 33.34);
        assert_eq!(n.items[1].amount, 33.33);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let b = breakdown(&[("pool1", 10.0), ("pool2", 20.0), ("pool3", 30.0)], 60.0);
        let once = b.normalize(100.0).unwrap();
        let twice = once.normalize(100.0).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_zero_total_is_error() {
        let b = breakdown(&[("pool1", 5.0), ("pool2", -5.0)], 0.0);
        let err = b.normalize(10.0).unwrap_err();
        assert!(err.is_allocation());
    }

    #[test]
    fn test_distribute_by_proportion() {
        let strategy = AllocationStrategy::new(vec![
            PoolAllocation::new("pool1", 0.5),
            PoolAllocation::new("pool2", 0.3),
            PoolAllocation::new("pool3", 0.2),
        ]);
        let b = strategy.distribute(1000.0).unwrap();
        assert_eq!(b.items[0].amount, 500.0);
        assert_eq!(b.items[1].amount, 300.0);
        assert_eq!(b.items[2].amount, 200.0);
        assert_eq!(b.total_amount, 1000.0);
    }

    #[test]
    fn test_distribute_rounding_sums_exactly() {
        let strategy = AllocationStrategy::new(vec![
            PoolAllocation::new("pool1", 1.0 / 3.0),
            PoolAllocation::new("pool2", 1.0 / 3.0),
            PoolAllocation::new("pool3", 1.0 / 3.0),
        ]);
        let b = strategy.distribute(10.0).unwrap();
        assert!((b.items_total() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_distribute_empty_strategy_is_error() {
        let strategy = AllocationStrategy::new(Vec::new());
        assert!(strategy.distribute(100.0).is_err());
    }

    #[test]
    fn test_strategy_deserialize() {
        let json = r#"{"allocations":[{"poolId":"p1","proportion":1.0}],"isActive":true}"#;
        let strategy: AllocationStrategy = serde_json::from_str(json).unwrap();
        assert!(strategy.is_active);
        assert_eq!(strategy.proportion_total(), 1.0);
    }

    #[test]
    fn test_strategy_deserialize_defaults_active() {
        let json = r#"{"allocations":[{"poolId":"p1","proportion":1.0}]}"#;
        let strategy: AllocationStrategy = serde_json::from_str(json).unwrap();
        assert!(strategy.is_active);

        let json = r#"{"allocations":[{"poolId":"p1","proportion":1.0}],"isActive":false}"#;
        let strategy: AllocationStrategy = serde_json::from_str(json).unwrap();
        assert!(!strategy.is_active);
    }
}
