// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Compact frequency index for blocks of `u32` values.
//!
//! Given a block's raw values, `build_index` produces a small byte string
//! that answers "how many times does V occur in this block?" without
//! rescanning the block. If the encoded index would cost more to keep around
//! than it is expected to save, the builder declines and returns `None`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  types.rs   │────▶│   index.rs   │────▶│  search.rs  │
//! │ (Frequency- │     │ (build_index,│     │(query_index,│
//! │  Table)     │     │ IndexBuilder)│     │ Frequency-  │
//! └─────────────┘     └──────────────┘     │  Index)     │
//!        │                   │             └─────────────┘
//!        │            ┌──────┴──────┐             │
//!        │            │   cost.rs   │             │
//!        ▼            ▼             ▼             ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                     binary/                         │
//! │  (varint, header, bitmap + overflow counts,         │
//! │   .fqx container)                                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use freqidx::{build_index, query_index, CostParams};
//!
//! let params = CostParams::new(1.0, 1000.0)?;
//! let index = build_index(&[5, 5, 5], &params)?;
//!
//! assert_eq!(query_index(5, index.as_deref())?, Some(3));
//! assert_eq!(query_index(6, index.as_deref())?, Some(0));
//! assert_eq!(query_index(5, None)?, None);
//! # Ok::<(), freqidx::Error>(())
//! ```

// Module declarations
pub mod batch;
pub mod binary;
pub mod contracts;
pub mod cost;
mod error;
mod index;
mod search;
mod types;
pub mod verify;

// Re-exports for public API
pub use batch::{build_indexes, build_outcomes, BatchSummary};
pub use cost::{CostConfig, CostModel, CostParams, BYTES_PER_KIB, ESTIMATED_QUERIES_PER_BLOCK};
pub use error::{Error, Result};
pub use index::{build_index, encode_items, BuildOutcome, IndexBuilder};
pub use search::{query_index, Entries, FrequencyIndex};
pub use types::{FrequencyTable, IndexStats, SortedItem};
pub use verify::{verify_index, InvariantError, VerificationReport};
