//! Reference processor scores
//!
//! A fixed table of known processors and the score each one would reach.
//! The table only feeds the comparison chart; the benchmark never reads it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{CpuOrbError, Result};

/// One reference processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Processor name shown on the chart axis
    pub label: String,
    /// Score the processor reaches on this benchmark
    pub score: u64,
}

impl ReferenceEntry {
    pub fn new(label: impl Into<String>, score: u64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Ordered, immutable table of reference processors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceTable {
    entries: Vec<ReferenceEntry>,
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self {
            entries: vec![
                ReferenceEntry::new("Intel Core i5-12600K", 12_000),
                ReferenceEntry::new("Intel Core i7-13700K", 16_000),
                ReferenceEntry::new("Intel Core i9-13900K", 20_000),
                ReferenceEntry::new("Ryzen 5 7600X", 13_000),
                ReferenceEntry::new("Ryzen 7 7700X", 17_000),
            ],
        }
    }
}

impl ReferenceTable {
    /// Build a validated table
    pub fn new(entries: Vec<ReferenceEntry>) -> Result<Self> {
        let table = Self { entries };
        table.validate()?;
        Ok(table)
    }

    /// Check the table is non-empty, scores are positive and labels unique
    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(CpuOrbError::ConfigError(
                "Reference table must contain at least one entry".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            if entry.label.trim().is_empty() {
                return Err(CpuOrbError::ConfigError(
                    "Reference labels must not be empty".to_string(),
                ));
            }
            if entry.score == 0 {
                return Err(CpuOrbError::ConfigError(format!(
                    "Reference score for {} must be greater than 0",
                    entry.label
                )));
            }
            if !seen.insert(entry.label.as_str()) {
                return Err(CpuOrbError::ConfigError(format!(
                    "Duplicate reference label: {}",
                    entry.label
                )));
            }
        }

        Ok(())
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest reference score, 0 for an empty table
    pub fn max_score(&self) -> u64 {
        self.entries.iter().map(|e| e.score).max().unwrap_or(0)
    }

    pub fn get(&self, label: &str) -> Option<&ReferenceEntry> {
        self.entries.iter().find(|e| e.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = ReferenceTable::default();
        assert!(table.validate().is_ok());
        assert_eq!(table.len(), 5);
        assert_eq!(table.max_score(), 20_000);
        assert_eq!(table.get("Ryzen 5 7600X").map(|e| e.score), Some(13_000));
    }

    #[test]
    fn test_empty_table_rejected() {
        let err = ReferenceTable::new(Vec::new()).unwrap_err();
        assert!(matches!(err, CpuOrbError::ConfigError(_)));
    }

    #[test]
    fn test_zero_score_rejected() {
        let result = ReferenceTable::new(vec![ReferenceEntry::new("Slow", 0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let result = ReferenceTable::new(vec![
            ReferenceEntry::new("Same", 10),
            ReferenceEntry::new("Same", 20),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_label_rejected() {
        assert!(ReferenceTable::new(vec![ReferenceEntry::new("  ", 10)]).is_err());
    }

    #[test]
    fn test_order_is_preserved() {
        let table = ReferenceTable::new(vec![
            ReferenceEntry::new("B", 2),
            ReferenceEntry::new("A", 1),
        ])
        .unwrap();
        let labels: Vec<&str> = table.entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "A"]);
    }
}
