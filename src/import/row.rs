//! Loosely-typed import rows
//!
//! Rows arrive before any shape validation, so every cell is an
//! [`ImportValue`] that may be missing, the wrong type, or NaN.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single untyped cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImportValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl ImportValue {
    /// Text content, if this is a string cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the cell counts as absent: null or blank text
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// JSON representation, used in error details
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| serde_json::Value::String(n.to_string())),
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Other(v) => v.clone(),
        }
    }
}

impl fmt::Display for ImportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, ""),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
            Self::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<f64> for ImportValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for ImportValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ImportValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for ImportValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// One candidate transaction as an arbitrary key/value record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportRow(BTreeMap<String, ImportValue>);

impl ImportRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style cell setter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ImportValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ImportValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ImportValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ImportValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, ImportValue)> for ImportRow {
    fn from_iter<I: IntoIterator<Item = (String, ImportValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_loose_values() {
        let json = r#"{"amount": "12.50", "date": null, "flag": true, "n": 3, "tags": ["a"]}"#;
        let row: ImportRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.get("amount"), Some(&ImportValue::Text("12.50".into())));
        assert_eq!(row.get("date"), Some(&ImportValue::Null));
        assert_eq!(row.get("flag"), Some(&ImportValue::Bool(true)));
        assert_eq!(row.get("n"), Some(&ImportValue::Number(3.0)));
        assert!(matches!(row.get("tags"), Some(ImportValue::Other(_))));
    }

    #[test]
    fn test_blank_detection() {
        assert!(ImportValue::Null.is_blank());
        assert!(ImportValue::from("  ").is_blank());
        assert!(!ImportValue::from(0.0).is_blank());
    }

    #[test]
    fn test_nan_to_json() {
        assert_eq!(
            ImportValue::Number(f64::NAN).to_json(),
            serde_json::Value::String("NaN".into())
        );
    }
}
