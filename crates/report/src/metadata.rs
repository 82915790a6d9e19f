//! Report metadata: ordered key-value pairs shown near the top of each page

use crate::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A metadata value: free text or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Integer(v) => write!(f, "{v}"),
            MetaValue::Number(v) => write!(f, "{v}"),
            MetaValue::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Text(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Text(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        MetaValue::Integer(value)
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        MetaValue::Number(value)
    }
}

/// Insertion-ordered metadata mapping
///
/// Keys are displayed in the order they were inserted; inserting an
/// existing key again updates its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<(String, MetaValue)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update an entry
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parse metadata from a JSON object, preserving key order
    ///
    /// Values must be strings or numbers; anything else is rejected.
    ///
    /// # Example
    /// ```ignore
    /// let metadata = Metadata::from_json(r#"{"Patient ID": "123", "Beams": 4}"#)?;
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut metadata = Metadata::new();
        for (key, value) in object {
            let value = match value {
                serde_json::Value::String(s) => MetaValue::Text(s),
                serde_json::Value::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        MetaValue::Integer(i)
                    } else {
                        MetaValue::Number(n.as_f64().unwrap_or(0.0))
                    }
                }
                other => {
                    return Err(ReportError::Metadata(format!(
                        "value for '{key}' must be a string or number, got {other}"
                    )))
                }
            };
            metadata.insert(key, value);
        }
        Ok(metadata)
    }

    /// Render the metadata block lines: a "Metadata:" heading followed
    /// by one "key: value" line per entry
    pub(crate) fn display_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len() + 1);
        lines.push("Metadata:".to_string());
        for (key, value) in &self.entries {
            lines.push(format!("{key}: {value}"));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insertion_order_preserved() {
        let mut metadata = Metadata::new();
        metadata.insert("Unit", "TrueBeam");
        metadata.insert("Patient ID", "123");
        metadata.insert("Beams", 4i64);

        let keys: Vec<&str> = metadata.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Unit", "Patient ID", "Beams"]);
    }

    #[test]
    fn test_insert_existing_key_updates_in_place() {
        let mut metadata = Metadata::new();
        metadata.insert("a", 1i64);
        metadata.insert("b", 2i64);
        metadata.insert("a", "updated");

        assert_eq!(metadata.len(), 2);
        let entries: Vec<_> = metadata.iter().collect();
        assert_eq!(entries[0], ("a", &MetaValue::Text("updated".to_string())));
    }

    #[test]
    fn test_display_lines() {
        let mut metadata = Metadata::new();
        metadata.insert("Patient ID", "123");
        metadata.insert("Tolerance", 1.5f64);

        assert_eq!(
            metadata.display_lines(),
            vec!["Metadata:", "Patient ID: 123", "Tolerance: 1.5"]
        );
    }

    #[test]
    fn test_from_json_preserves_order() {
        let metadata =
            Metadata::from_json(r#"{"Unit": "TrueBeam", "Patient ID": "123", "Beams": 4}"#)
                .unwrap();
        let keys: Vec<&str> = metadata.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Unit", "Patient ID", "Beams"]);
        let values: Vec<String> = metadata.iter().map(|(_, v)| v.to_string()).collect();
        assert_eq!(values, vec!["TrueBeam", "123", "4"]);
    }

    #[test]
    fn test_from_json_rejects_non_scalar() {
        assert!(Metadata::from_json(r#"{"nested": {"a": 1}}"#).is_err());
        assert!(Metadata::from_json(r#"{"flag": true}"#).is_err());
    }

    #[test]
    fn test_meta_value_untagged_roundtrip() {
        let value: MetaValue = serde_json::from_str("\"text\"").unwrap();
        assert_eq!(value, MetaValue::Text("text".to_string()));
        let value: MetaValue = serde_json::from_str("42").unwrap();
        assert_eq!(value, MetaValue::Integer(42));
        let value: MetaValue = serde_json::from_str("1.25").unwrap();
        assert_eq!(value, MetaValue::Number(1.25));
    }
}
