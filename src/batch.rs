// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Building indexes for many blocks at once.
//!
//! Each block's index depends on nothing but the block and the cost
//! parameters, so this is embarrassingly parallel. With the `parallel`
//! feature, rayon's `par_iter()` spreads blocks over the thread pool;
//! without it, the same code runs sequentially. Output order always matches
//! input order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::index::{BuildOutcome, IndexBuilder};

/// Per-batch totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub blocks: usize,
    pub indexed: usize,
    pub rejected: usize,
    pub index_bytes: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[BuildOutcome]) -> Self {
        outcomes.iter().fold(
            Self {
                blocks: outcomes.len(),
                ..Self::default()
            },
            |mut acc, outcome| {
                match outcome {
                    BuildOutcome::Indexed(bytes) => {
                        acc.indexed += 1;
                        acc.index_bytes += bytes.len();
                    }
                    BuildOutcome::Rejected { .. } => acc.rejected += 1,
                }
                acc
            },
        )
    }
}

/// Build every block with `builder`, keeping the full outcome per block.
///
/// Fails with the first error in block order.
pub fn build_outcomes<B>(builder: &IndexBuilder, blocks: &[B]) -> Result<Vec<BuildOutcome>>
where
    B: AsRef<[u32]> + Sync,
{
    #[cfg(feature = "parallel")]
    let outcomes: Result<Vec<BuildOutcome>> = blocks
        .par_iter()
        .map(|block| builder.build(block.as_ref()))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let outcomes: Result<Vec<BuildOutcome>> = blocks
        .iter()
        .map(|block| builder.build(block.as_ref()))
        .collect();

    let outcomes = outcomes?;
    let summary = BatchSummary::from_outcomes(&outcomes);
    debug!(
        blocks = summary.blocks,
        indexed = summary.indexed,
        rejected = summary.rejected,
        index_bytes = summary.index_bytes,
        "built frequency indexes"
    );
    Ok(outcomes)
}

/// `build_index` over many blocks: one `Option<Vec<u8>>` per block.
pub fn build_indexes<B>(builder: &IndexBuilder, blocks: &[B]) -> Result<Vec<Option<Vec<u8>>>>
where
    B: AsRef<[u32]> + Sync,
{
    Ok(build_outcomes(builder, blocks)?
        .into_iter()
        .map(BuildOutcome::into_index)
        .collect())
}
