// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `.fqx` container: the indexes for a run of blocks in one file.
//!
//! The index bytes themselves carry no magic, no version and no checksum;
//! persisting them is the caller's job. This is the CLI's way of doing that.
//! A 12-byte header, a length table with one u32 per block (0 means the
//! builder rejected that block), the payloads back to back, and an 8-byte
//! footer with a CRC32 over everything before it plus the reversed magic.
//!
//! ```text
//! ┌──────────────┬──────────────────┬─────────────┬──────────────┐
//! │ HEADER [12B] │ LENGTHS [4B × n] │ PAYLOADS    │ FOOTER [8B]  │
//! └──────────────┴──────────────────┴─────────────┴──────────────┘
//! ```

use std::io::{self, Read, Write};

use crc32fast::Hasher as Crc32Hasher;

use crate::error::{Error, Result};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic bytes: "FQIX" in ASCII (header)
pub const MAGIC: [u8; 4] = [0x46, 0x51, 0x49, 0x58];

/// Footer magic: "XIQF" (reversed, marks valid file end)
pub const FOOTER_MAGIC: [u8; 4] = [0x58, 0x49, 0x51, 0x46];

/// Current container version
pub const VERSION: u8 = 1;

/// Maximum container size: 1 GiB
pub const MAX_CONTAINER_SIZE: usize = 1024 * 1024 * 1024;

// ============================================================================
// HEADER / FOOTER
// ============================================================================

/// Container header (12 bytes fixed size)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub version: u8,
    pub flags: u8,
    pub block_count: u32,
}

impl ContainerHeader {
    // 4 (magic) + 1 (version) + 1 (flags) + 2 (reserved) + 4 (block_count) = 12
    pub const SIZE: usize = 12;

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&MAGIC)?;
        w.write_all(&[self.version, self.flags])?;
        w.write_all(&[0u8; 2])?; // reserved
        w.write_all(&self.block_count.to_le_bytes())?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid magic: expected FQIX, got {:?}", magic),
            ));
        }

        let mut buf = [0u8; 8]; // 12 - 4 (magic) = 8
        r.read_exact(&mut buf)?;

        Ok(Self {
            version: buf[0],
            flags: buf[1],
            // buf[2..4] is reserved
            block_count: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        })
    }
}

/// Footer with CRC32 checksum and magic number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerFooter {
    /// CRC32 of header + length table + payloads
    pub crc32: u32,
}

impl ContainerFooter {
    pub const SIZE: usize = 8; // 4 bytes CRC32 + 4 bytes magic

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.crc32.to_le_bytes())?;
        w.write_all(&FOOTER_MAGIC)?;
        Ok(())
    }

    pub fn read(bytes: &[u8]) -> io::Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "File too short for footer",
            ));
        }

        let footer_start = bytes.len() - Self::SIZE;
        let magic = &bytes[footer_start + 4..];
        if magic != FOOTER_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid footer magic: expected XIQF, got {:?}", magic),
            ));
        }

        let crc32 = u32::from_le_bytes([
            bytes[footer_start],
            bytes[footer_start + 1],
            bytes[footer_start + 2],
            bytes[footer_start + 3],
        ]);

        Ok(Self { crc32 })
    }

    /// Compute CRC32 over the given bytes
    pub fn compute_crc32(data: &[u8]) -> u32 {
        let mut hasher = Crc32Hasher::new();
        hasher.update(data);
        hasher.finalize()
    }
}

// ============================================================================
// CONTAINER
// ============================================================================

/// Per-block indexes, `None` where the builder declined to index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    pub blocks: Vec<Option<Vec<u8>>>,
}

impl Container {
    pub fn new(blocks: Vec<Option<Vec<u8>>>) -> Self {
        Self { blocks }
    }

    /// Index bytes for block `i`, or `None` if absent or out of range.
    pub fn block(&self, i: usize) -> Option<&[u8]> {
        self.blocks.get(i).and_then(|b| b.as_deref())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let block_count = u32::try_from(self.blocks.len())
            .map_err(|_| Error::Container(format!("too many blocks: {}", self.blocks.len())))?;

        let mut buf = Vec::new();
        ContainerHeader {
            version: VERSION,
            flags: 0,
            block_count,
        }
        .write(&mut buf)?;

        for block in &self.blocks {
            let len = block.as_ref().map_or(0, Vec::len);
            let len = u32::try_from(len)
                .map_err(|_| Error::Container(format!("block payload too large: {} bytes", len)))?;
            buf.extend_from_slice(&len.to_le_bytes());
        }
        for block in self.blocks.iter().flatten() {
            buf.extend_from_slice(block);
        }

        let crc32 = ContainerFooter::compute_crc32(&buf);
        ContainerFooter { crc32 }.write(&mut buf)?;

        if buf.len() > MAX_CONTAINER_SIZE {
            return Err(Error::Container(format!(
                "container of {} bytes exceeds limit {}",
                buf.len(),
                MAX_CONTAINER_SIZE
            )));
        }
        Ok(buf)
    }

    /// Parse a container, checking magic, version, CRC and the length table.
    ///
    /// Payloads are returned as stored; run `verify_index` on them for a
    /// structural check.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > MAX_CONTAINER_SIZE {
            return Err(Error::Container(format!(
                "container of {} bytes exceeds limit {}",
                bytes.len(),
                MAX_CONTAINER_SIZE
            )));
        }
        if bytes.len() < ContainerHeader::SIZE + ContainerFooter::SIZE {
            return Err(Error::Container(format!(
                "file too small ({} bytes, minimum {})",
                bytes.len(),
                ContainerHeader::SIZE + ContainerFooter::SIZE
            )));
        }

        let footer = ContainerFooter::read(bytes)?;
        let content = &bytes[..bytes.len() - ContainerFooter::SIZE];
        let actual = ContainerFooter::compute_crc32(content);
        if actual != footer.crc32 {
            return Err(Error::Container(format!(
                "CRC32 mismatch: stored {:08x}, computed {:08x}",
                footer.crc32, actual
            )));
        }

        let header = ContainerHeader::read(&mut io::Cursor::new(content))?;
        if header.version != VERSION {
            return Err(Error::Container(format!(
                "unsupported version {} (expected {})",
                header.version, VERSION
            )));
        }

        let block_count = header.block_count as usize;
        let table_end = block_count
            .checked_mul(4)
            .and_then(|n| n.checked_add(ContainerHeader::SIZE))
            .filter(|&end| end <= content.len())
            .ok_or_else(|| {
                Error::Container(format!("length table for {} blocks is truncated", block_count))
            })?;

        let mut pos = table_end;
        let mut blocks = Vec::with_capacity(block_count);
        for chunk in content[ContainerHeader::SIZE..table_end].chunks_exact(4) {
            let len = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as usize;
            if len == 0 {
                blocks.push(None);
                continue;
            }
            let end = pos
                .checked_add(len)
                .filter(|&end| end <= content.len())
                .ok_or_else(|| {
                    Error::Container(format!(
                        "block {} payload of {} bytes runs past end of file",
                        blocks.len(),
                        len
                    ))
                })?;
            blocks.push(Some(content[pos..end].to_vec()));
            pos = end;
        }

        if pos != content.len() {
            return Err(Error::Container(format!(
                "{} trailing bytes after last payload",
                content.len() - pos
            )));
        }

        Ok(Self { blocks })
    }
}
