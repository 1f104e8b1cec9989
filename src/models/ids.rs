//! Strongly-typed ID wrappers for all entity types
//!
//! Ids arrive from the persistence layer as opaque strings, so each wrapper
//! holds a `String`. Using newtype wrappers prevents accidentally mixing up a
//! pool id with a channel id at compile time.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID
            pub fn generate() -> Self {
                Self(format!("{}{}", $prefix, Uuid::new_v4().simple()))
            }

            /// Wrap an existing identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier is empty or only whitespace
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(PoolId, "pool-");
define_id!(ChannelId, "chn-");
define_id!(TransactionId, "txn-");
define_id!(BudgetId, "bud-");
define_id!(StrategyId, "str-");

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_prefixed_and_unique() {
        let a = PoolId::generate();
        let b = PoolId::generate();
        assert!(a.as_str().starts_with("pool-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_blank_detection() {
        assert!(ChannelId::new("  ").is_blank());
        assert!(!ChannelId::new("checking").is_blank());
    }

    #[test]
    fn test_id_serialization() {
        let id = PoolId::new("pool1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"pool1\"");

        let deserialized: PoolId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut set = HashSet::new();
        set.insert(PoolId::new("pool1"));
        assert!(set.contains("pool1"));
    }
}
