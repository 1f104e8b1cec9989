//! Balance models
//!
//! Balances are supplied by the persistence layer, never derived here. A
//! [`PoolBalance`] is the signed amount of one pool held in one channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ids::{BudgetId, ChannelId, PoolId};

/// Amount of a pool held in a channel; negative is possible on credit channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolBalance {
    pub pool_id: PoolId,
    pub channel_id: ChannelId,
    pub amount: f64,
}

impl PoolBalance {
    pub fn new(pool_id: impl Into<PoolId>, channel_id: impl Into<ChannelId>, amount: f64) -> Self {
        Self {
            pool_id: pool_id.into(),
            channel_id: channel_id.into(),
            amount,
        }
    }
}

/// The live balance state of a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentBalance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<BudgetId>,
    pub balances: Vec<PoolBalance>,
    pub last_updated: DateTime<Utc>,
}

impl CurrentBalance {
    pub fn new(balances: Vec<PoolBalance>) -> Self {
        Self {
            budget_id: None,
            balances,
            last_updated: Utc::now(),
        }
    }

    /// Total held per pool across all channels
    pub fn totals_by_pool(&self) -> HashMap<PoolId, f64> {
        totals_by_pool(&self.balances)
    }
}

/// A point-in-time copy of a budget's balances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<BudgetId>,
    pub balances: Vec<PoolBalance>,
    pub snapshot_date: DateTime<Utc>,
}

impl BalanceSnapshot {
    pub fn new(balances: Vec<PoolBalance>, snapshot_date: DateTime<Utc>) -> Self {
        Self {
            budget_id: None,
            balances,
            snapshot_date,
        }
    }
}

/// Sum signed balances per pool
pub fn totals_by_pool(balances: &[PoolBalance]) -> HashMap<PoolId, f64> {
    let mut totals: HashMap<PoolId, f64> = HashMap::with_capacity(balances.len());
    for balance in balances {
        *totals.entry(balance.pool_id.clone()).or_insert(0.0) += balance.amount;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_by_pool() {
        let current = CurrentBalance::new(vec![
            PoolBalance::new("pool1", "chk", 100.0),
            PoolBalance::new("pool1", "sav", 50.0),
            PoolBalance::new("pool2", "chk", 25.0),
        ]);
        let totals = current.totals_by_pool();
        assert_eq!(totals.get("pool1"), Some(&150.0));
        assert_eq!(totals.get("pool2"), Some(&25.0));
        assert_eq!(totals.get("pool3"), None);
    }

    #[test]
    fn test_snapshot_deserialize() {
        let json = r#"{
            "balances": [{"poolId": "p1", "channelId": "c1", "amount": -20.0}],
            "snapshotDate": "2025-03-01T00:00:00Z"
        }"#;
        let snapshot: BalanceSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.balances[0].amount, -20.0);
    }
}
