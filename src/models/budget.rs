//! Budget document
//!
//! The in-memory view of a whole budget as handed over by the persistence
//! layer: every pool, channel, transaction, and strategy, plus the supplied
//! balance state. Loaded from JSON or YAML by the binary.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::allocation::AllocationStrategy;
use super::balance::CurrentBalance;
use super::channel::{Channel, ChannelType};
use super::ids::{BudgetId, ChannelId, PoolId};
use super::pool::Pool;
use super::transaction::Transaction;
use crate::error::{PoolkeeperError, PoolkeeperResult};

/// Everything the engine may be asked to check about one budget
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BudgetId>,

    #[serde(default)]
    pub pools: Vec<Pool>,

    #[serde(default)]
    pub channels: Vec<Channel>,

    #[serde(default)]
    pub transactions: Vec<Transaction>,

    #[serde(default)]
    pub strategies: Vec<AllocationStrategy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_balance: Option<CurrentBalance>,

    /// Outstanding credit debt per pool
    #[serde(default)]
    pub credit_debts: HashMap<PoolId, f64>,
}

impl Budget {
    /// Load a budget document, picking the format from the file extension
    pub fn load(path: &Path) -> PoolkeeperResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PoolkeeperError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;

        match extension(path).as_deref() {
            Some("json") => Ok(serde_json::from_str(&contents)?),
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&contents)?),
            other => Err(PoolkeeperError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// Find a transaction by id
    pub fn find_transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id.as_str() == id)
    }

    /// Channel type lookup for every known channel
    pub fn channel_types(&self) -> HashMap<ChannelId, ChannelType> {
        self.channels
            .iter()
            .map(|c| (c.id.clone(), c.channel_type))
            .collect()
    }

    /// Available balance per pool, summed across channels
    pub fn available_by_pool(&self) -> HashMap<PoolId, f64> {
        self.current_balance
            .as_ref()
            .map(|c| c.totals_by_pool())
            .unwrap_or_default()
    }
}

pub(crate) fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChannelType, PoolBalance, PurposeType};
    use std::io::Write;
    use tempfile::TempDir;

    fn sample() -> Budget {
        Budget {
            id: Some(BudgetId::new("b1")),
            pools: vec![Pool::new("pool1", "b1", PurposeType::Spending)],
            channels: vec![Channel::new("chk", "b1", ChannelType::Checking)],
            current_balance: Some(CurrentBalance::new(vec![
                PoolBalance::new("pool1", "chk", 80.0),
                PoolBalance::new("pool1", "sav", 20.0),
            ])),
            ..Default::default()
        }
    }

    #[test]
    fn test_available_by_pool() {
        let available = sample().available_by_pool();
        assert_eq!(available.get("pool1"), Some(&100.0));
    }

    #[test]
    fn test_load_json_and_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let budget = sample();

        let json_path = temp_dir.path().join("budget.json");
        std::fs::write(&json_path, serde_json::to_string(&budget).unwrap()).unwrap();
        assert_eq!(Budget::load(&json_path).unwrap(), budget);

        let yaml_path = temp_dir.path().join("budget.yaml");
        let mut file = std::fs::File::create(&yaml_path).unwrap();
        write!(file, "{}", serde_yaml::to_string(&budget).unwrap()).unwrap();
        assert_eq!(Budget::load(&yaml_path).unwrap(), budget);
    }

    #[test]
    fn test_load_unknown_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budget.toml");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            Budget::load(&path),
            Err(PoolkeeperError::UnsupportedFormat(_))
        ));
    }
}
