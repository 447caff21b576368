//! Per-call consistency cache
//!
//! Maps each distinct `(normalized value, type)` to one replacement so that
//! repeated values anonymize identically within a call. A cache lives for a
//! single `anonymize` call and is never shared between calls.

use crate::anonymization::config::Strategy;
use crate::anonymization::models::{PiiType, ReplacementRecord};
use std::collections::HashMap;

/// Normalize a value for cache keys and hashing
///
/// Lowercases, trims and collapses whitespace runs to one space.
pub fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Replacement cache scoped to one anonymize call
#[derive(Debug, Default)]
pub struct ConsistencyCache {
    index: HashMap<(String, PiiType), usize>,
    records: Vec<ReplacementRecord>,
    ordinals: HashMap<PiiType, usize>,
}

impl ConsistencyCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached replacement for `(normalized, label)` or create one
    ///
    /// On a miss `generator` receives the 1-based ordinal of this value among
    /// the distinct values of `label` seen so far, and its output is recorded
    /// together with `original` and `strategy`.
    pub fn get_or_create<F>(
        &mut self,
        normalized: &str,
        label: PiiType,
        strategy: Strategy,
        original: &str,
        generator: F,
    ) -> String
    where
        F: FnOnce(usize) -> String,
    {
        let key = (normalized.to_string(), label);
        if let Some(&position) = self.index.get(&key) {
            return self.records[position].replacement.clone();
        }

        let ordinal = self.ordinals.entry(label).or_insert(0);
        *ordinal += 1;
        let replacement = generator(*ordinal);

        self.index.insert(key, self.records.len());
        self.records.push(ReplacementRecord {
            original_value: original.to_string(),
            replacement: replacement.clone(),
            label,
            strategy,
        });

        replacement
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing has been cached
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the cache, yielding records in first-appearance order
    pub fn into_records(self) -> Vec<ReplacementRecord> {
        self.records
    }
}
