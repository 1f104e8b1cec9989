//! Core data models for Poolkeeper
//!
//! This module contains the data structures that represent the budgeting
//! domain as the integrity engine sees it: pools, channels, allocations,
//! transactions, and supplied balances. All of them are plain value snapshots.

pub mod allocation;
pub mod balance;
pub mod budget;
pub mod channel;
pub mod ids;
pub mod pool;
pub mod transaction;

pub use allocation::{
    round_cents, AllocationBreakdown, AllocationItem, AllocationStrategy, PoolAllocation,
};
pub use balance::{BalanceSnapshot, CurrentBalance, PoolBalance};
pub use budget::Budget;
pub use channel::{Channel, ChannelType};
pub use ids::{BudgetId, ChannelId, PoolId, StrategyId, TransactionId};
pub use pool::{Pool, PurposeType};
pub use transaction::{Transaction, TransactionKind, TransactionType};
