// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format for frequency indexes.
//!
//! An index answers one question about one block: how many times does value
//! V occur? The values it knows about are stored sorted and delta-encoded as
//! varints, so a dense run of values costs a byte each. Counts are split: a
//! bitmap flags the values that occur once (usually most of them), and only
//! the rest pay for a varint.
//!
//! # Security Considerations
//!
//! Index bytes come back from whatever storage the caller uses, so the reader
//! treats them as untrusted:
//! - The header's `counts_offset` is checked against the buffer before use
//! - Every varint read is bounds-checked and limited to 5 bytes
//! - A biased overflow count that would exceed u32 is rejected
//!
//! A malformed index is an error, never a silently wrong count.
//!
//! # Format Overview
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ HEADER (8 bytes)                                           │
//! │   num_distinct: u32                                        │
//! │   counts_offset: u32 (absolute)                            │
//! ├────────────────────────────────────────────────────────────┤
//! │ VALUES (num_distinct varints)                              │
//! │   first value verbatim, then value[i] - value[i-1]         │
//! ├──────────────── counts_offset ─────────────────────────────┤
//! │ PRESENCE BITMAP (ceil(num_distinct / 8) bytes, LSB first)  │
//! │   bit i = 1 iff count[i] == 1                              │
//! ├────────────────────────────────────────────────────────────┤
//! │ OVERFLOW (one varint per unset bit, count - 2)             │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `.fqx` container in [`container`] wraps any number of these for the
//! CLI; the index bytes never depend on it.

// Submodules
pub mod container;
mod counts;
mod encoding;
mod header;

// Re-export from submodules for public API
pub use container::{Container, ContainerFooter, ContainerHeader};
pub use counts::{
    advance_past_overflow_entries, count_at, decode_counts, decode_overflow_count, encode_counts,
    is_singleton, overflow_entries_before, singleton_count, OVERFLOW_BIAS,
};
pub use encoding::{decode_varint, encode_varint, skip_varint, varint_len};
pub use header::{bitmap_len, IndexHeader, IndexLayout, MAX_BLOCK_LEN, MAX_VARINT_BYTES};
