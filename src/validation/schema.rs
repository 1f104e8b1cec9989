//! Shape checks
//!
//! The typed models already guarantee field presence and primitive types.
//! What remains of "shape" is structural: identifiers are non-blank, numbers
//! are finite, a breakdown's items add up to its declared total, and no pool
//! is listed twice. A shape failure is reported as a single
//! `SCHEMA_VALIDATION_FAILED` error whose details carry every issue found.

use serde::Serialize;
use serde_json::json;

use super::result::{ErrorCode, ValidationError};
use crate::config::Tolerances;
use crate::models::{
    AllocationBreakdown, AllocationStrategy, BalanceSnapshot, CurrentBalance, PoolBalance,
    Transaction, TransactionKind,
};

/// One structural problem, addressed by a dotted path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeIssue {
    pub path: String,
    pub message: String,
}

impl ShapeIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Anything the shape layer knows how to check
pub trait Shape {
    /// Name used in the failure message
    const KIND: &'static str;

    /// Every structural problem with this value; empty means well-formed
    fn shape_issues(&self, tolerances: &Tolerances) -> Vec<ShapeIssue>;
}

/// Run the shape layer and convert a failure into a validation error
pub fn check_shape<T: Shape>(value: &T, tolerances: &Tolerances) -> Option<ValidationError> {
    let issues = value.shape_issues(tolerances);
    if issues.is_empty() {
        return None;
    }

    tracing::trace!(kind = T::KIND, issues = issues.len(), "shape check failed");
    Some(
        ValidationError::new(
            ErrorCode::SchemaValidationFailed,
            format!("{} failed schema validation", T::KIND),
        )
        .with_detail("issues", json!(issues)),
    )
}

fn require_id(issues: &mut Vec<ShapeIssue>, path: &str, id: &str) {
    if id.trim().is_empty() {
        issues.push(ShapeIssue::new(path, "must be a non-empty identifier"));
    }
}

fn require_finite(issues: &mut Vec<ShapeIssue>, path: &str, value: f64) {
    if !value.is_finite() {
        issues.push(ShapeIssue::new(path, "must be a finite number"));
    }
}

fn require_text(issues: &mut Vec<ShapeIssue>, path: &str, value: &str) {
    if value.trim().is_empty() {
        issues.push(ShapeIssue::new(path, "must be a non-empty string"));
    }
}

impl Shape for AllocationBreakdown {
    const KIND: &'static str = "Allocation breakdown";

    fn shape_issues(&self, tolerances: &Tolerances) -> Vec<ShapeIssue> {
        let mut issues = Vec::new();
        for (idx, item) in self.items.iter().enumerate() {
            require_id(&mut issues, &format!("items.{}.poolId", idx), item.pool_id.as_str());
            require_finite(&mut issues, &format!("items.{}.amount", idx), item.amount);
        }
        require_finite(&mut issues, "totalAmount", self.total_amount);

        let items_total = self.items_total();
        if items_total.is_finite()
            && self.total_amount.is_finite()
            && !tolerances.amounts_match(items_total, self.total_amount)
        {
            issues.push(ShapeIssue::new(
                "items",
                format!(
                    "items sum to {:.2} but totalAmount is {:.2}",
                    items_total, self.total_amount
                ),
            ));
        }

        for pool_id in self.duplicate_pool_ids() {
            issues.push(ShapeIssue::new(
                "items",
                format!("pool {} appears more than once", pool_id),
            ));
        }
        issues
    }
}

impl Shape for AllocationStrategy {
    const KIND: &'static str = "Allocation strategy";

    fn shape_issues(&self, _tolerances: &Tolerances) -> Vec<ShapeIssue> {
        let mut issues = Vec::new();
        require_id(&mut issues, "id", self.id.as_str());
        for (idx, allocation) in self.allocations.iter().enumerate() {
            require_id(
                &mut issues,
                &format!("allocations.{}.poolId", idx),
                allocation.pool_id.as_str(),
            );
            require_finite(
                &mut issues,
                &format!("allocations.{}.proportion", idx),
                allocation.proportion,
            );
        }
        issues
    }
}

impl Shape for Transaction {
    const KIND: &'static str = "Transaction";

    fn shape_issues(&self, _tolerances: &Tolerances) -> Vec<ShapeIssue> {
        let mut issues = Vec::new();
        require_id(&mut issues, "id", self.id.as_str());
        require_id(&mut issues, "budgetId", self.budget_id.as_str());
        require_finite(&mut issues, "amount", self.amount);

        match &self.kind {
            TransactionKind::Income {
                channel_id, source, ..
            } => {
                require_id(&mut issues, "channelId", channel_id.as_str());
                require_text(&mut issues, "source", source);
            }
            TransactionKind::Expense {
                channel_id,
                category,
                ..
            } => {
                require_id(&mut issues, "channelId", channel_id.as_str());
                require_text(&mut issues, "category", category);
            }
            TransactionKind::Transfer {
                source_channel_id,
                destination_channel_id,
                ..
            } => {
                require_id(&mut issues, "sourceChannelId", source_channel_id.as_str());
                require_id(
                    &mut issues,
                    "destinationChannelId",
                    destination_channel_id.as_str(),
                );
            }
        }
        issues
    }
}

impl Shape for PoolBalance {
    const KIND: &'static str = "Pool balance";

    fn shape_issues(&self, _tolerances: &Tolerances) -> Vec<ShapeIssue> {
        let mut issues = Vec::new();
        require_id(&mut issues, "poolId", self.pool_id.as_str());
        require_id(&mut issues, "channelId", self.channel_id.as_str());
        require_finite(&mut issues, "amount", self.amount);
        issues
    }
}

impl Shape for CurrentBalance {
    const KIND: &'static str = "Current balance";

    fn shape_issues(&self, _tolerances: &Tolerances) -> Vec<ShapeIssue> {
        let mut issues = Vec::new();
        if let Some(budget_id) = &self.budget_id {
            require_id(&mut issues, "budgetId", budget_id.as_str());
        }
        issues
    }
}

impl Shape for BalanceSnapshot {
    const KIND: &'static str = "Balance snapshot";

    fn shape_issues(&self, _tolerances: &Tolerances) -> Vec<ShapeIssue> {
        let mut issues = Vec::new();
        if let Some(budget_id) = &self.budget_id {
            require_id(&mut issues, "budgetId", budget_id.as_str());
        }
        issues
    }
}
