// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fixed index header and format constants.
//!
//! The header is 8 bytes: the distinct-value count and the absolute offset
//! of the counts section, both little-endian u32. Everything after it is
//! variable width, so the header is the only thing a reader can trust
//! positionally. `IndexLayout` turns it into section ranges and is the one
//! place that does that arithmetic.

use std::io::{self, Read, Write};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Maximum varint bytes (u32 needs at most 5 bytes)
pub const MAX_VARINT_BYTES: usize = 5;

/// Values and counts are 32-bit, so a block can hold at most this many values.
pub const MAX_BLOCK_LEN: usize = u32::MAX as usize;

// ============================================================================
// HEADER
// ============================================================================

/// Index header (8 bytes fixed size)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexHeader {
    pub num_distinct: u32,
    /// Absolute byte offset of the presence bitmap
    pub counts_offset: u32,
}

impl IndexHeader {
    // 4 (num_distinct) + 4 (counts_offset) = 8
    pub const SIZE: usize = 8;

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.num_distinct.to_le_bytes())?;
        w.write_all(&self.counts_offset.to_le_bytes())?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; Self::SIZE];
        r.read_exact(&mut buf)?;

        Ok(Self {
            num_distinct: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            counts_offset: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        })
    }

    /// Compute and bounds-check section ranges against an index of `index_len` bytes.
    pub fn layout(&self, index_len: usize) -> io::Result<IndexLayout> {
        IndexLayout::new(self, index_len)
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Byte ranges of each section within an encoded index.
///
/// Ranges are half-open `(start, end)`. The overflow section runs to the end
/// of the buffer because its length is only known by decoding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexLayout {
    pub values: (usize, usize),
    pub bitmap: (usize, usize),
    pub overflow: (usize, usize),
}

impl IndexLayout {
    fn new(h: &IndexHeader, index_len: usize) -> io::Result<Self> {
        let counts_offset = h.counts_offset as usize;
        let num_distinct = h.num_distinct as usize;

        if counts_offset < IndexHeader::SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "counts_offset {} points inside the {}-byte header",
                    counts_offset,
                    IndexHeader::SIZE
                ),
            ));
        }

        // Every value takes at least one byte
        let values_len = counts_offset - IndexHeader::SIZE;
        if values_len < num_distinct {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "values section of {} bytes cannot hold {} values",
                    values_len, num_distinct
                ),
            ));
        }

        let bitmap_end = counts_offset + bitmap_len(num_distinct);
        if bitmap_end > index_len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "bitmap ends at {} but index is {} bytes",
                    bitmap_end, index_len
                ),
            ));
        }

        Ok(Self {
            values: (IndexHeader::SIZE, counts_offset),
            bitmap: (counts_offset, bitmap_end),
            overflow: (bitmap_end, index_len),
        })
    }
}

/// Presence bitmap size in bytes: one bit per distinct value, rounded up.
#[inline]
pub fn bitmap_len(num_distinct: usize) -> usize {
    num_distinct.div_ceil(8)
}
