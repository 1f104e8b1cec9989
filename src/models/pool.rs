//! Pool model
//!
//! A pool is a labeled bucket of money with a purpose, independent of which
//! channel physically holds it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, PoolId};

/// What a pool's money is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PurposeType {
    /// Day-to-day spending money
    #[default]
    Spending,
    /// Open-ended savings
    Saving,
    /// Savings toward a specific target
    Goal,
}

impl PurposeType {
    /// Parse purpose type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "spending" => Some(Self::Spending),
            "saving" | "savings" => Some(Self::Saving),
            "goal" => Some(Self::Goal),
            _ => None,
        }
    }
}

impl fmt::Display for PurposeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spending => write!(f, "Spending"),
            Self::Saving => write!(f, "Saving"),
            Self::Goal => write!(f, "Goal"),
        }
    }
}

/// A purpose-tagged money pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    /// Unique identifier
    pub id: PoolId,

    /// Owning budget
    pub budget_id: BudgetId,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// What the pool is for
    pub purpose_type: PurposeType,

    /// Inactive pools are treated as missing by integrity checks
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Pool {
    /// Create a new active pool
    pub fn new(
        id: impl Into<PoolId>,
        budget_id: impl Into<BudgetId>,
        purpose_type: PurposeType,
    ) -> Self {
        Self {
            id: id.into(),
            budget_id: budget_id.into(),
            name: String::new(),
            purpose_type,
            is_active: true,
        }
    }

    /// Builder-style name setter
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder-style deactivation
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{} ({})", self.id, self.purpose_type)
        } else {
            write!(f, "{} ({})", self.name, self.purpose_type)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pool_is_active() {
        let pool = Pool::new("pool1", "budget1", PurposeType::Saving);
        assert!(pool.is_active);
        assert_eq!(pool.id.as_str(), "pool1");
        assert!(!pool.inactive().is_active);
    }

    #[test]
    fn test_named_pool_serializes_name() {
        let pool = Pool::new("pool1", "budget1", PurposeType::Goal).named("Vacation");
        assert_eq!(pool.name, "Vacation");
        let json = serde_json::to_value(&pool).unwrap();
        assert_eq!(json["name"], "Vacation");
        assert_eq!(json["purposeType"], "goal");
    }

    #[test]
    fn test_purpose_parse() {
        assert_eq!(PurposeType::parse("Goal"), Some(PurposeType::Goal));
        assert_eq!(PurposeType::parse("savings"), Some(PurposeType::Saving));
        assert_eq!(PurposeType::parse("rent"), None);
    }

    #[test]
    fn test_deserialize_defaults_active() {
        let json = r#"{"id":"p1","budgetId":"b1","purposeType":"goal"}"#;
        let pool: Pool = serde_json::from_str(json).unwrap();
        assert!(pool.is_active);
        assert_eq!(pool.purpose_type, PurposeType::Goal);
    }
}
