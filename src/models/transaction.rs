//! Transaction model
//!
//! Transactions are a tagged union over income, expense, and transfer. The
//! fields every variant shares live on [`Transaction`]; the variant-specific
//! payload lives on [`TransactionKind`], discriminated by the `type` field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::allocation::AllocationBreakdown;
use super::ids::{BudgetId, ChannelId, PoolId, TransactionId};

/// Discriminant of a transaction, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl TransactionType {
    /// Parse a transaction type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
            Self::Transfer => write!(f, "transfer"),
        }
    }
}

/// Variant-specific transaction data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum TransactionKind {
    /// Money arriving in a channel
    Income {
        channel_id: ChannelId,
        source: String,
        allocation_breakdown: AllocationBreakdown,
    },
    /// Money leaving a channel
    Expense {
        channel_id: ChannelId,
        category: String,
        allocation_breakdown: AllocationBreakdown,
    },
    /// Money moving between channels and/or pools
    Transfer {
        source_channel_id: ChannelId,
        destination_channel_id: ChannelId,
        source_allocation: AllocationBreakdown,
        destination_allocation: AllocationBreakdown,
    },
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Owning budget
    pub budget_id: BudgetId,

    /// Positive amount moved by this transaction
    pub amount: f64,

    /// When the transaction happened
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    /// Free-text notes/description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(flatten)]
    pub kind: TransactionKind,
}

impl Transaction {
    /// Create an income transaction dated now
    pub fn income(
        channel_id: impl Into<ChannelId>,
        amount: f64,
        source: impl Into<String>,
        allocation_breakdown: AllocationBreakdown,
    ) -> Self {
        Self::with_kind(
            amount,
            TransactionKind::Income {
                channel_id: channel_id.into(),
                source: source.into(),
                allocation_breakdown,
            },
        )
    }

    /// Create an expense transaction dated now
    pub fn expense(
        channel_id: impl Into<ChannelId>,
        amount: f64,
        category: impl Into<String>,
        allocation_breakdown: AllocationBreakdown,
    ) -> Self {
        Self::with_kind(
            amount,
            TransactionKind::Expense {
                channel_id: channel_id.into(),
                category: category.into(),
                allocation_breakdown,
            },
        )
    }

    /// Create a transfer transaction dated now
    pub fn transfer(
        source_channel_id: impl Into<ChannelId>,
        destination_channel_id: impl Into<ChannelId>,
        amount: f64,
        source_allocation: AllocationBreakdown,
        destination_allocation: AllocationBreakdown,
    ) -> Self {
        Self::with_kind(
            amount,
            TransactionKind::Transfer {
                source_channel_id: source_channel_id.into(),
                destination_channel_id: destination_channel_id.into(),
                source_allocation,
                destination_allocation,
            },
        )
    }

    fn with_kind(amount: f64, kind: TransactionKind) -> Self {
        Self {
            id: TransactionId::generate(),
            budget_id: BudgetId::new("default"),
            amount,
            date: Some(Utc::now()),
            notes: None,
            kind,
        }
    }

    /// Builder-style notes setter
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builder-style date setter
    pub fn on(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Builder-style budget setter
    pub fn in_budget(mut self, budget_id: impl Into<BudgetId>) -> Self {
        self.budget_id = budget_id.into();
        self
    }

    /// The discriminant of this transaction
    pub fn transaction_type(&self) -> TransactionType {
        match self.kind {
            TransactionKind::Income { .. } => TransactionType::Income,
            TransactionKind::Expense { .. } => TransactionType::Expense,
            TransactionKind::Transfer { .. } => TransactionType::Transfer,
        }
    }

    /// Check if this is a transfer
    pub fn is_transfer(&self) -> bool {
        matches!(self.kind, TransactionKind::Transfer { .. })
    }

    /// Every channel this transaction references
    pub fn channel_ids(&self) -> Vec<&ChannelId> {
        match &self.kind {
            TransactionKind::Income { channel_id, .. }
            | TransactionKind::Expense { channel_id, .. } => vec![channel_id],
            TransactionKind::Transfer {
                source_channel_id,
                destination_channel_id,
                ..
            } => vec![source_channel_id, destination_channel_id],
        }
    }

    /// Every allocation breakdown this transaction carries, labelled by field
    pub fn allocations(&self) -> Vec<(&'static str, &AllocationBreakdown)> {
        match &self.kind {
            TransactionKind::Income {
                allocation_breakdown,
                ..
            }
            | TransactionKind::Expense {
                allocation_breakdown,
                ..
            } => vec![("allocationBreakdown", allocation_breakdown)],
            TransactionKind::Transfer {
                source_allocation,
                destination_allocation,
                ..
            } => vec![
                ("sourceAllocation", source_allocation),
                ("destinationAllocation", destination_allocation),
            ],
        }
    }

    /// Every pool id referenced by any of this transaction's allocations
    pub fn pool_ids(&self) -> impl Iterator<Item = &PoolId> {
        self.allocations()
            .into_iter()
            .flat_map(|(_, b)| b.items.iter().map(|i| &i.pool_id))
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        write!(
            f,
            "{} {} {:<8} {:.2}",
            date,
            self.id,
            self.transaction_type(),
            self.amount
        )
    }
}
