//! Channel model
//!
//! A channel is a physical or financial account (cash, checking, savings,
//! credit) that holds money across one or more pools.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, ChannelId};

/// Type of financial channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    /// Cash/wallet
    Cash,
    /// Checking account
    #[default]
    Checking,
    /// Savings account
    Savings,
    /// Credit card or line of credit
    Credit,
}

impl ChannelType {
    /// Returns true if a negative balance is a normal state for this channel
    pub fn is_liability(&self) -> bool {
        matches!(self, Self::Credit)
    }

    /// Parse channel type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "checking" => Some(Self::Checking),
            "savings" => Some(Self::Savings),
            "credit" | "credit_card" | "creditcard" => Some(Self::Credit),
            _ => None,
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Checking => write!(f, "Checking"),
            Self::Savings => write!(f, "Savings"),
            Self::Credit => write!(f, "Credit"),
        }
    }
}

/// A financial channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// Unique identifier
    pub id: ChannelId,

    /// Owning budget
    pub budget_id: BudgetId,

    /// Display name (e.g., "Chase Checking")
    #[serde(default)]
    pub name: String,

    /// Type of channel
    #[serde(rename = "type")]
    pub channel_type: ChannelType,

    /// Credit limit, meaningful for credit channels only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<f64>,

    /// Inactive channels are treated as missing by integrity checks
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Channel {
    /// Create a new active channel
    pub fn new(
        id: impl Into<ChannelId>,
        budget_id: impl Into<BudgetId>,
        channel_type: ChannelType,
    ) -> Self {
        Self {
            id: id.into(),
            budget_id: budget_id.into(),
            name: String::new(),
            channel_type,
            credit_limit: None,
            is_active: true,
        }
    }

    /// Builder-style credit limit setter
    pub fn with_credit_limit(mut self, limit: f64) -> Self {
        self.credit_limit = Some(limit);
        self
    }

    /// Builder-style deactivation
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{} ({})", self.id, self.channel_type)
        } else {
            write!(f, "{} ({})", self.name, self.channel_type)
        }
    }
}
