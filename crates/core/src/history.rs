//! Caller-owned accumulator for past classification results.
//!
//! The UI layer owns one [`ClassificationLog`] per session and feeds
//! every report into it; the client crates hold no state across calls.
//! Summary helpers back whatever statistics the caller wants to render.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classification::{Classification, Priority};

/// Append-only history of classified emails.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationLog {
    records: Vec<Classification>,
}

impl ClassificationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one classification.
    pub fn push(&mut self, record: Classification) {
        self.records.push(record);
    }

    /// Append every classification from a report batch.
    pub fn extend<I: IntoIterator<Item = Classification>>(&mut self, records: I) {
        self.records.extend(records);
    }

    /// Total number of accumulated classifications.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when nothing has been accumulated yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All accumulated records, oldest first.
    pub fn records(&self) -> &[Classification] {
        &self.records
    }

    /// Number of records classified as [`Priority::High`].
    pub fn high_priority_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.priority == Priority::High)
            .count()
    }

    /// Record count per category, sorted by category name.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.category.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Mean confidence across all records, `None` when empty.
    pub fn average_confidence(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let total: f64 = self.records.iter().map(|r| r.confidence).sum();
        Some(total / self.records.len() as f64)
    }
}
