// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Point queries against an encoded frequency index.
//!
//! Lookup is a linear walk over the delta-encoded values, rebuilding each
//! value as a running sum. Sorted order gives an early exit: the moment the
//! running value passes the predicate, the answer is 0. On a hit at position
//! `p`, the bitmap either says "exactly once" or sends us to the overflow
//! stream, where we skip the overflow entries that precede `p`.
//!
//! Three outcomes, none of them errors:
//!
//! | Input                | Result          |
//! |----------------------|-----------------|
//! | no index (or empty)  | `Ok(None)`      |
//! | value not in block   | `Ok(Some(0))`   |
//! | value in block       | `Ok(Some(n))`   |
//!
//! Bytes that do not follow the format are `Err`, never a guessed count.

use std::io::{self, Cursor};

use crate::binary::{
    count_at, decode_counts, decode_overflow_count, decode_varint, is_singleton, singleton_count,
    IndexHeader, IndexLayout,
};
use crate::error::Result;
use crate::types::{IndexStats, SortedItem};

/// Count occurrences of `predicate` in the block `index` was built from.
///
/// `None` (or an empty slice) means the caller has no index for the block,
/// and comes back as `Ok(None)`.
pub fn query_index(predicate: u32, index: Option<&[u8]>) -> Result<Option<u32>> {
    match index {
        Some(bytes) if !bytes.is_empty() => {
            FrequencyIndex::parse(bytes)?.count(predicate).map(Some)
        }
        _ => Ok(None),
    }
}

/// Read-only view over encoded index bytes.
///
/// `parse` checks the header against the buffer once; `count` can then be
/// called any number of times. The view borrows, so it is as cheap to share
/// across threads as the slice itself.
#[derive(Debug, Clone, Copy)]
pub struct FrequencyIndex<'a> {
    bytes: &'a [u8],
    header: IndexHeader,
    layout: IndexLayout,
}

impl<'a> FrequencyIndex<'a> {
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < IndexHeader::SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "index of {} bytes is shorter than the {}-byte header",
                    bytes.len(),
                    IndexHeader::SIZE
                ),
            )
            .into());
        }

        let header = IndexHeader::read(&mut Cursor::new(bytes))?;
        let layout = header.layout(bytes.len())?;
        Ok(Self {
            bytes,
            header,
            layout,
        })
    }

    pub fn num_distinct(&self) -> usize {
        self.header.num_distinct as usize
    }

    pub fn counts_offset(&self) -> usize {
        self.header.counts_offset as usize
    }

    pub fn layout(&self) -> IndexLayout {
        self.layout
    }

    fn values_section(&self) -> &'a [u8] {
        // Sliced to end at counts_offset so a runaway varint cannot read the bitmap
        &self.bytes[..self.layout.values.1]
    }

    fn bitmap(&self) -> &'a [u8] {
        &self.bytes[self.layout.bitmap.0..self.layout.bitmap.1]
    }

    /// Position of `predicate` in the sorted value list, if present.
    pub fn position_of(&self, predicate: u32) -> Result<Option<usize>> {
        let values = self.values_section();
        let mut pos = self.layout.values.0;
        let mut current = 0u32;

        for i in 0..self.num_distinct() {
            let (delta, next) = decode_varint(values, pos)?;
            pos = next;
            current = if i == 0 {
                delta
            } else {
                checked_value(current, delta, pos)?
            };

            if current == predicate {
                return Ok(Some(i));
            }
            // Sorted: nothing later can match
            if current > predicate {
                return Ok(None);
            }
        }

        Ok(None)
    }

    /// Occurrence count of `predicate`; 0 if the block never contained it.
    pub fn count(&self, predicate: u32) -> Result<u32> {
        let Some(position) = self.position_of(predicate)? else {
            return Ok(0);
        };
        Ok(count_at(
            self.bytes,
            self.bitmap(),
            self.layout.overflow.0,
            position,
        )?)
    }

    /// Decode every `(value, count)` pair in ascending value order.
    pub fn entries(&self) -> Entries<'a> {
        Entries {
            index: *self,
            position: 0,
            value_pos: self.layout.values.0,
            overflow_pos: self.layout.overflow.0,
            current: 0,
            failed: false,
        }
    }

    /// Section sizes and the singleton/overflow split.
    pub fn stats(&self) -> Result<IndexStats> {
        let num_distinct = self.num_distinct();
        let (counts, overflow_end) =
            decode_counts(self.bytes, self.bitmap(), self.layout.overflow.0, num_distinct)?;
        let singletons = singleton_count(self.bitmap(), num_distinct);

        Ok(IndexStats {
            num_distinct,
            singletons,
            overflow_entries: num_distinct - singletons,
            total_occurrences: counts.iter().map(|&c| u64::from(c)).sum(),
            header_bytes: IndexHeader::SIZE,
            values_bytes: self.layout.values.1 - self.layout.values.0,
            bitmap_bytes: self.layout.bitmap.1 - self.layout.bitmap.0,
            overflow_bytes: overflow_end - self.layout.overflow.0,
        })
    }
}

fn checked_value(current: u32, delta: u32, pos: usize) -> io::Result<u32> {
    current.checked_add(delta).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("value delta ending at offset {} overflows u32", pos),
        )
    })
}

/// Iterator over the entries of a `FrequencyIndex`.
///
/// Stops after the first decoding error.
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    index: FrequencyIndex<'a>,
    position: usize,
    value_pos: usize,
    overflow_pos: usize,
    current: u32,
    failed: bool,
}

impl Entries<'_> {
    fn next_item(&mut self) -> io::Result<SortedItem> {
        let (delta, next) = decode_varint(self.index.values_section(), self.value_pos)?;
        self.value_pos = next;
        self.current = if self.position == 0 {
            delta
        } else {
            checked_value(self.current, delta, next)?
        };

        let count = if is_singleton(self.index.bitmap(), self.position) {
            1
        } else {
            let (count, next) = decode_overflow_count(self.index.bytes, self.overflow_pos)?;
            self.overflow_pos = next;
            count
        };

        self.position += 1;
        Ok(SortedItem {
            value: self.current,
            count,
        })
    }

    /// Byte offset just past the last value varint read so far.
    pub fn values_end(&self) -> usize {
        self.value_pos
    }

    /// Byte offset just past the last overflow varint read so far.
    pub fn overflow_end(&self) -> usize {
        self.overflow_pos
    }
}

impl Iterator for Entries<'_> {
    type Item = io::Result<SortedItem>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.position >= self.index.num_distinct() {
            return None;
        }
        let item = self.next_item();
        self.failed = item.is_err();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.index.num_distinct().saturating_sub(self.position);
        (0, Some(remaining))
    }
}
