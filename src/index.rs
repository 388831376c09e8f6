// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Frequency index construction.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **VALUES_SORTED**: items are encoded in strictly ascending value order
//! 2. **HEADER_MATCHES**: `num_distinct` equals the number of encoded values and
//!    `counts_offset` is the exact end of the values section
//! 3. **COUNTS_PARTITION**: each item is either a bitmap bit or an overflow
//!    varint, never both, never neither
//!
//! # Encoding
//!
//! Two passes. The values section is encoded into its own buffer first, so
//! the counts offset is known before the header is written and nothing gets
//! patched after the fact. Then header, values, bitmap, overflow, in order.
//!
//! Building never fails on a well-sized block. Whether the result is kept is
//! the cost model's call, and a rejection is an ordinary `BuildOutcome`.

use tracing::{debug, trace};

use crate::binary::{encode_counts, encode_varint, IndexHeader, MAX_BLOCK_LEN};
use crate::contracts::check_index_well_formed;
use crate::cost::{CostModel, CostParams};
use crate::error::{Error, Result};
use crate::types::{FrequencyTable, SortedItem};

/// What the builder decided for one block.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    /// Encoded index worth persisting.
    Indexed(Vec<u8>),
    /// Encoded fine, but larger than the cost model allows.
    Rejected {
        encoded_size: usize,
        break_even_bytes: f64,
    },
}

impl BuildOutcome {
    pub fn is_indexed(&self) -> bool {
        matches!(self, BuildOutcome::Indexed(_))
    }

    /// The index bytes, or `None` if rejected.
    pub fn into_index(self) -> Option<Vec<u8>> {
        match self {
            BuildOutcome::Indexed(bytes) => Some(bytes),
            BuildOutcome::Rejected { .. } => None,
        }
    }
}

/// Builds frequency indexes under a fixed set of cost parameters.
#[derive(Debug, Clone, Copy)]
pub struct IndexBuilder {
    params: CostParams,
    model: CostModel,
}

impl IndexBuilder {
    pub fn new(params: CostParams) -> Self {
        Self {
            params,
            model: CostModel::default(),
        }
    }

    /// Replace the admission constants.
    pub fn with_model(mut self, model: CostModel) -> Self {
        self.model = model;
        self
    }

    pub fn params(&self) -> &CostParams {
        &self.params
    }

    pub fn model(&self) -> &CostModel {
        &self.model
    }

    /// Count, sort, encode, then ask the cost model.
    pub fn build(&self, values: &[u32]) -> Result<BuildOutcome> {
        if values.len() > MAX_BLOCK_LEN {
            return Err(Error::BlockTooLarge { len: values.len() });
        }

        let items = FrequencyTable::from_values(values).into_sorted_items();
        let index = encode_items(&items).ok_or(Error::BlockTooLarge { len: values.len() })?;

        let ratio = self.params.ratio();
        let break_even_bytes = self.model.break_even_bytes(ratio);
        trace!(
            values = values.len(),
            distinct = items.len(),
            encoded_size = index.len(),
            break_even_bytes,
            "encoded frequency index"
        );

        if !self.model.accept(index.len(), ratio) {
            debug!(
                encoded_size = index.len(),
                break_even_bytes, "frequency index rejected by cost model"
            );
            return Ok(BuildOutcome::Rejected {
                encoded_size: index.len(),
                break_even_bytes,
            });
        }

        Ok(BuildOutcome::Indexed(index))
    }
}

/// Build an index for `values`, or `None` if it is not worth storing.
pub fn build_index(values: &[u32], params: &CostParams) -> Result<Option<Vec<u8>>> {
    IndexBuilder::new(*params)
        .build(values)
        .map(BuildOutcome::into_index)
}

/// Encode items that are already sorted ascending by value with counts >= 1.
///
/// Returns `None` if the counts offset does not fit in u32.
pub fn encode_items(items: &[SortedItem]) -> Option<Vec<u8>> {
    let num_distinct = u32::try_from(items.len()).ok()?;

    // Pass 1: values section, so counts_offset is known up front
    let mut values = Vec::with_capacity(items.len() * 2);
    let mut prev = 0u32;
    for (i, item) in items.iter().enumerate() {
        let delta = if i == 0 { item.value } else { item.value - prev };
        encode_varint(delta, &mut values);
        prev = item.value;
    }

    let counts_offset = u32::try_from(IndexHeader::SIZE + values.len()).ok()?;

    // Pass 2: header, values, counts
    let mut index = Vec::with_capacity(counts_offset as usize + items.len() / 8 + 1);
    IndexHeader {
        num_distinct,
        counts_offset,
    }
    .write(&mut index)
    .ok()?;
    index.extend_from_slice(&values);

    let counts: Vec<u32> = items.iter().map(|item| item.count).collect();
    encode_counts(&counts, &mut index);

    check_index_well_formed(&index, items);
    Some(index)
}
