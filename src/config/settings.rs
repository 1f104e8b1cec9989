//! User settings for Poolkeeper
//!
//! Holds the numeric tolerances injected into the validator and the knobs
//! that shape the import pipeline and balance checks.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PoolkeeperError, PoolkeeperResult};

/// Absolute tolerance for dollar comparisons
pub const AMOUNT_TOLERANCE: f64 = 0.01;

/// Tolerance for proportion sums
pub const PROPORTION_TOLERANCE: f64 = 0.0001;

/// Epsilons below which two quantities are treated as equal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tolerances {
    /// Dollar amounts, e.g. breakdown sum against declared total
    #[serde(default = "default_amount")]
    pub amount: f64,

    /// Strategy proportions against 1.0
    #[serde(default = "default_proportion")]
    pub proportion: f64,
}

fn default_amount() -> f64 {
    AMOUNT_TOLERANCE
}

fn default_proportion() -> f64 {
    PROPORTION_TOLERANCE
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            amount: AMOUNT_TOLERANCE,
            proportion: PROPORTION_TOLERANCE,
        }
    }
}

impl Tolerances {
    /// Whether two dollar amounts are equal within tolerance
    pub fn amounts_match(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.amount
    }

    /// Whether a proportion total is 1.0 within tolerance
    pub fn proportions_complete(&self, total: f64) -> bool {
        (total - 1.0).abs() <= self.proportion
    }

    /// Reject tolerances that would make every comparison meaningless
    pub fn validate(&self) -> PoolkeeperResult<()> {
        for (name, value) in [("amount", self.amount), ("proportion", self.proportion)] {
            if !value.is_finite() || value < 0.0 {
                return Err(PoolkeeperError::Config(format!(
                    "{} tolerance must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// User settings for Poolkeeper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Comparison tolerances
    #[serde(default)]
    pub tolerances: Tolerances,

    /// Extra date formats (strftime) accepted for imported rows
    #[serde(default)]
    pub import_date_formats: Vec<String>,

    /// Report negative balances on credit channels as warnings, not errors
    #[serde(default)]
    pub flag_credit_negative_as_warning: bool,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            tolerances: Tolerances::default(),
            import_date_formats: Vec::new(),
            flag_credit_negative_as_warning: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_default(path: &Path) -> PoolkeeperResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| PoolkeeperError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            PoolkeeperError::Config(format!("Failed to parse settings file: {}", e))
        })?;

        settings.tolerances.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, path: &Path) -> PoolkeeperResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PoolkeeperError::Io(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            PoolkeeperError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(path, contents)
            .map_err(|e| PoolkeeperError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.tolerances.amount, 0.01);
        assert_eq!(settings.tolerances.proportion, 0.0001);
        assert!(!settings.flag_credit_negative_as_warning);
    }

    #[test]
    fn test_tolerance_comparisons() {
        let t = Tolerances::default();
        assert!(t.amounts_match(150.0, 150.01));
        assert!(!t.amounts_match(150.0, 150.02));
        assert!(t.proportions_complete(0.99995));
        assert!(!t.proportions_complete(0.9));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let mut settings = Settings::default();
        settings.tolerances.amount = 0.05;
        settings.import_date_formats.push("%d.%m.%Y".into());
        settings.save(&path).unwrap();

        let loaded = Settings::load_or_default(&path).unwrap();
        assert_eq!(loaded.tolerances.amount, 0.05);
        assert_eq!(loaded.import_date_formats, vec!["%d.%m.%Y".to_string()]);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Settings::load_or_default(&temp_dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded.tolerances, Tolerances::default());
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"tolerances": {"amount": -1}}"#).unwrap();
        assert!(matches!(
            Settings::load_or_default(&path),
            Err(PoolkeeperError::Config(_))
        ));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"flagCreditNegativeAsWarning": true}"#).unwrap();
        let loaded = Settings::load_or_default(&path).unwrap();
        assert!(loaded.flag_credit_negative_as_warning);
        assert_eq!(loaded.schema_version, 1);
    }
}
