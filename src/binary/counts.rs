// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Counts section: presence bitmap followed by overflow varints.
//!
//! Most distinct values in a block occur exactly once, so spending a varint
//! byte on each of those is waste. The bitmap takes one bit per value and
//! marks the singletons. Everything else gets a varint in the overflow
//! stream holding `count - 2` (a stored count is never 0 or 1, so the offset
//! buys a few values per byte).
//!
//! Finding the overflow entry for position `p` means counting the unset bits
//! before `p` and stepping over that many varints. Varints are variable
//! width, so there is no stride arithmetic: `advance_past_overflow_entries`
//! walks them one at a time.

use std::io;

use super::encoding::{decode_varint, encode_varint, skip_varint};
use super::header::bitmap_len;

/// Counts below this are never written to the overflow stream.
pub const OVERFLOW_BIAS: u32 = 2;

// ============================================================================
// ENCODING
// ============================================================================

/// Append the bitmap and overflow varints for `counts` (in sorted-value order).
///
/// Every count must be at least 1.
pub fn encode_counts(counts: &[u32], buf: &mut Vec<u8>) {
    let bitmap_start = buf.len();
    buf.resize(bitmap_start + bitmap_len(counts.len()), 0);

    for (i, &count) in counts.iter().enumerate() {
        debug_assert!(count >= 1, "count at position {} is zero", i);
        if count == 1 {
            buf[bitmap_start + i / 8] |= 1 << (i % 8);
        } else {
            encode_varint(count - OVERFLOW_BIAS, buf);
        }
    }
}

// ============================================================================
// BITMAP
// ============================================================================

/// Whether the entry at `position` occurs exactly once.
#[inline]
pub fn is_singleton(bitmap: &[u8], position: usize) -> bool {
    bitmap[position / 8] & (1 << (position % 8)) != 0
}

/// Number of unset bits in `0..position`, i.e. overflow entries before it.
pub fn overflow_entries_before(bitmap: &[u8], position: usize) -> usize {
    let full_bytes = position / 8;
    let mut singletons: usize = bitmap[..full_bytes]
        .iter()
        .map(|b| b.count_ones() as usize)
        .sum();

    let tail_bits = position % 8;
    if tail_bits > 0 {
        let mask = (1u8 << tail_bits) - 1;
        singletons += (bitmap[full_bytes] & mask).count_ones() as usize;
    }

    position - singletons
}

/// Number of set bits among the first `num_distinct` positions.
pub fn singleton_count(bitmap: &[u8], num_distinct: usize) -> usize {
    num_distinct - overflow_entries_before(bitmap, num_distinct)
}

// ============================================================================
// OVERFLOW STREAM
// ============================================================================

/// Skip `k` overflow varints starting at `start`, returning the offset of the next one.
pub fn advance_past_overflow_entries(bytes: &[u8], start: usize, k: usize) -> io::Result<usize> {
    let mut pos = start;
    for _ in 0..k {
        pos = skip_varint(bytes, pos)?;
    }
    Ok(pos)
}

/// Decode one overflow varint at `pos` and undo the bias.
pub fn decode_overflow_count(bytes: &[u8], pos: usize) -> io::Result<(u32, usize)> {
    let (stored, next) = decode_varint(bytes, pos)?;
    let count = stored.checked_add(OVERFLOW_BIAS).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Overflow count {} at offset {} exceeds u32", stored, pos),
        )
    })?;
    Ok((count, next))
}

/// Look up the count for `position` given the bitmap and the overflow start.
pub fn count_at(bytes: &[u8], bitmap: &[u8], overflow_start: usize, position: usize) -> io::Result<u32> {
    if is_singleton(bitmap, position) {
        return Ok(1);
    }

    let k = overflow_entries_before(bitmap, position);
    let pos = advance_past_overflow_entries(bytes, overflow_start, k)?;
    decode_overflow_count(bytes, pos).map(|(count, _)| count)
}

/// Decode every count in order. Returns the counts and the offset just past the last varint.
pub fn decode_counts(
    bytes: &[u8],
    bitmap: &[u8],
    overflow_start: usize,
    num_distinct: usize,
) -> io::Result<(Vec<u32>, usize)> {
    let mut counts = Vec::with_capacity(num_distinct);
    let mut pos = overflow_start;

    for i in 0..num_distinct {
        if is_singleton(bitmap, i) {
            counts.push(1);
        } else {
            let (count, next) = decode_overflow_count(bytes, pos)?;
            counts.push(count);
            pos = next;
        }
    }

    Ok((counts, pos))
}
