//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::collections::HashMap;

use freqidx::{build_index, query_index, CostParams};

// ============================================================================
// COST PARAMETERS
// ============================================================================

/// Ratio 1.0: every index under ~550 KiB is accepted.
pub fn cheap_params() -> CostParams {
    CostParams::new(1.0, 1.0).unwrap()
}

/// Reading a block is a thousand times cheaper than skipping it: ~563 byte budget.
pub fn realistic_params() -> CostParams {
    CostParams::new(1.0, 1000.0).unwrap()
}

// ============================================================================
// ORACLES
// ============================================================================

/// Reference occurrence counts by direct scan.
pub fn occurrences(values: &[u32]) -> HashMap<u32, u32> {
    let mut counts = HashMap::new();
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Build with cheap params; panics if the builder declines.
pub fn build_accepted(values: &[u32]) -> Vec<u8> {
    build_index(values, &cheap_params())
        .unwrap()
        .expect("cheap params should accept small blocks")
}

/// Assert every value of the block queries to its scanned count.
pub fn assert_counts_match(index: &[u8], values: &[u32]) {
    for (value, expected) in occurrences(values) {
        assert_eq!(
            query_index(value, Some(index)).unwrap(),
            Some(expected),
            "count mismatch for value {}",
            value
        );
    }
}

/// Header fields as stored, little-endian.
pub fn header_fields(index: &[u8]) -> (u32, u32) {
    let num_distinct = u32::from_le_bytes([index[0], index[1], index[2], index[3]]);
    let counts_offset = u32::from_le_bytes([index[4], index[5], index[6], index[7]]);
    (num_distinct, counts_offset)
}
