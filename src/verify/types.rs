// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Structural invariants of an encoded index, checked against raw bytes.
//!
//! A query only decodes what it needs, so it can answer correctly from an
//! index that is broken somewhere it never looks. `verify_index` decodes
//! everything and checks the whole format:
//!
//! | Check                     | What's Guaranteed                              |
//! |---------------------------|------------------------------------------------|
//! | header layout             | `counts_offset` and bitmap fit in the buffer   |
//! | values sorted             | reconstructed values strictly increase         |
//! | values section length     | last value varint ends exactly at counts_offset|
//! | bitmap padding            | bits past `num_distinct` are zero              |
//! | overflow length           | last overflow varint ends exactly at the end   |
//!
//! # Example
//!
//! ```ignore
//! let report = verify_index(&bytes)?;
//! assert_eq!(report.stats.singletons + report.stats.overflow_entries, report.stats.num_distinct);
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::error::Result;
use crate::search::FrequencyIndex;
use crate::types::{IndexStats, SortedItem};

/// Error type for invariant violations in bytes that otherwise decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// A value is not strictly greater than its predecessor.
    #[error("values not strictly increasing at position {position} (value {value} after {previous})")]
    UnsortedValues {
        position: usize,
        previous: u32,
        value: u32,
    },
    /// The values section does not end at `counts_offset`.
    #[error("values section ends at {actual} but counts_offset is {expected}")]
    ValuesSectionLength { expected: usize, actual: usize },
    /// Bits past `num_distinct` in the last bitmap byte are set.
    #[error("bitmap padding bits set in final byte {byte:#010b}")]
    BitmapPadding { byte: u8 },
    /// Bytes remain after the last overflow varint.
    #[error("{count} trailing bytes after overflow section")]
    TrailingBytes { count: usize },
}

/// Result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub stats: IndexStats,
    pub min_value: Option<u32>,
    pub max_value: Option<u32>,
}

/// Decode and check every invariant of an encoded index.
///
/// Decoding failures come back as `Error::Io`, invariant failures as
/// `Error::Invariant`.
pub fn verify_index(bytes: &[u8]) -> Result<VerificationReport> {
    let index = FrequencyIndex::parse(bytes)?;
    let layout = index.layout();
    let num_distinct = index.num_distinct();

    let mut entries = index.entries();
    let mut previous: Option<u32> = None;
    let mut min_value = None;
    for (position, item) in entries.by_ref().enumerate() {
        let SortedItem { value, .. } = item?;
        if let Some(prev) = previous {
            if value <= prev {
                return Err(InvariantError::UnsortedValues {
                    position,
                    previous: prev,
                    value,
                }
                .into());
            }
        }
        min_value.get_or_insert(value);
        previous = Some(value);
    }

    if entries.values_end() != layout.values.1 {
        return Err(InvariantError::ValuesSectionLength {
            expected: layout.values.1,
            actual: entries.values_end(),
        }
        .into());
    }

    let tail_bits = num_distinct % 8;
    if tail_bits > 0 {
        let last = bytes[layout.bitmap.1 - 1];
        if last >> tail_bits != 0 {
            return Err(InvariantError::BitmapPadding { byte: last }.into());
        }
    }

    if entries.overflow_end() != bytes.len() {
        return Err(InvariantError::TrailingBytes {
            count: bytes.len() - entries.overflow_end(),
        }
        .into());
    }

    Ok(VerificationReport {
        stats: index.stats()?,
        min_value,
        max_value: previous,
    })
}

/// Decode all items of an index after verifying it.
pub fn decode_items(bytes: &[u8]) -> Result<Vec<SortedItem>> {
    verify_index(bytes)?;
    let items = FrequencyIndex::parse(bytes)?
        .entries()
        .collect::<std::io::Result<Vec<_>>>()?;
    Ok(items)
}
