// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raw cell values and row records fed to the list table builder.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A raw cell value: displayed text plus an optional group tag.
///
/// The group never appears in the rendered cell, but it takes part in the
/// equality used for row merging. Two cells reading "M" in groups "a" and "b"
/// stay separate even when they are adjacent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellValue {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl CellValue {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            group: None,
        }
    }

    /// A value tagged with a merge group.
    pub fn grouped(text: impl Into<String>, group: impl ToString) -> Self {
        Self {
            text: text.into(),
            group: Some(group.to_string()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for CellValue {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// One data row: field key to raw value, plus an optional explicit index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowRecord {
    /// Shown verbatim in the index column instead of the row ordinal
    /// (e.g. "1.1" for a sub-item).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(default)]
    pub fields: HashMap<String, CellValue>,
}

impl RowRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.get(key)
    }
}

impl<K, V> FromIterator<(K, V)> for RowRecord
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (key, value) in iter {
            row.insert(key, value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_participates_in_equality() {
        assert_eq!(CellValue::new("M"), CellValue::from("M"));
        assert_ne!(CellValue::grouped("M", "a"), CellValue::grouped("M", "b"));
        assert_ne!(CellValue::grouped("M", "a"), CellValue::new("M"));
        assert_eq!(CellValue::grouped("M", 1).text(), "M");
    }

    #[test]
    fn row_from_pairs() {
        let row: RowRecord = [("name", "Ada"), ("age", "36")].into_iter().collect();
        assert_eq!(row.get("name").map(CellValue::text), Some("Ada"));
        assert!(row.index.is_none());
    }

    #[test]
    fn row_deserializes_grouped_values() {
        let json = r#"{ "index": "1.1", "fields": { "sex": { "text": "M", "group": "g1" } } }"#;
        let row: RowRecord = serde_json::from_str(json).unwrap();
        assert_eq!(row.index.as_deref(), Some("1.1"));
        assert_eq!(row.get("sex"), Some(&CellValue::grouped("M", "g1")));
    }
}
