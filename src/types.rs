// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a frequency index.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **SortedItem list**: `items[i].value < items[i + 1].value`
//!   Strictly ascending. Delta encoding and the query's early exit both
//!   depend on it; a duplicate would encode as a zero delta and shadow
//!   the second entry forever.
//!
//! - **SortedItem**: `count >= 1`
//!   A value with no occurrences has no business in the index.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One distinct value and how often it occurs in the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SortedItem {
    pub value: u32,
    pub count: u32,
}

/// Occurrence counts for one block, keyed by value.
///
/// Lives only for the duration of a build.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<u32, u32>,
}

impl FrequencyTable {
    pub fn from_values(values: &[u32]) -> Self {
        let mut counts: HashMap<u32, u32> = HashMap::new();
        for &value in values {
            *counts.entry(value).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn num_distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, value: u32) -> u32 {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    /// Consume the table into items sorted ascending by value.
    pub fn into_sorted_items(self) -> Vec<SortedItem> {
        let mut items: Vec<SortedItem> = self
            .counts
            .into_iter()
            .map(|(value, count)| SortedItem { value, count })
            .collect();
        items.sort_unstable_by_key(|item| item.value);
        items
    }
}

/// Size breakdown of an encoded index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub num_distinct: usize,
    /// Values occurring exactly once (bitmap bits set)
    pub singletons: usize,
    /// Values stored in the overflow stream
    pub overflow_entries: usize,
    pub total_occurrences: u64,
    pub header_bytes: usize,
    pub values_bytes: usize,
    pub bitmap_bytes: usize,
    pub overflow_bytes: usize,
}

impl IndexStats {
    pub fn total_bytes(&self) -> usize {
        self.header_bytes + self.values_bytes + self.bitmap_bytes + self.overflow_bytes
    }
}
