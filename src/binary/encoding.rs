// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Varint codec for 32-bit values.
//!
//! Every variable-width field in the index goes through here: the first value,
//! the value deltas, and the overflow counts. Seven data bits per byte, low
//! groups first, high bit set when another byte follows. No length prefix.
//!
//! The wire format never carries its own bounds, so the decoder checks them:
//! running off the end of the buffer is `UnexpectedEof`, and a sixth byte or a
//! fifth byte with bits above 2^32 is `InvalidData`. Neither case panics.
//!
//! # References
//!
//! - **Varint (LEB128)**: Little-endian base-128 variable-length integer encoding.
//!   See DWARF4 §7.6 "Variable Length Data", and the Protocol Buffers encoding
//!   guide: <https://protobuf.dev/programming-guides/encoding/>

use std::io;

use super::header::MAX_VARINT_BYTES;

/// Bits a fifth byte may carry before the value overflows u32 (32 - 4*7 = 4).
const LAST_BYTE_MASK: u8 = 0x0F;

// ============================================================================
// VARINT ENCODING
// ============================================================================

/// Append `value` as a varint. Writes between 1 and `MAX_VARINT_BYTES` bytes.
pub fn encode_varint(mut value: u32, buf: &mut Vec<u8>) {
    while value >= 0x80 {
        buf.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Number of bytes `encode_varint` writes for `value`.
#[inline]
pub fn varint_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0xFFF_FFFF => 4,
        _ => 5,
    }
}

/// Decode the varint starting at `pos`, returning `(value, next_pos)`.
pub fn decode_varint(bytes: &[u8], pos: usize) -> io::Result<(u32, usize)> {
    let mut result: u32 = 0;
    let mut cursor = pos;

    for i in 0..MAX_VARINT_BYTES {
        let byte = *bytes.get(cursor).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("Truncated varint at offset {}", pos),
            )
        })?;
        cursor += 1;

        if i == MAX_VARINT_BYTES - 1 && byte & !LAST_BYTE_MASK != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Varint at offset {} overflows u32", pos),
            ));
        }

        result |= u32::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((result, cursor));
        }
    }

    // Not reached: the fifth-byte mask already rejects a continuation bit.
    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("Varint at offset {} exceeds {} bytes", pos, MAX_VARINT_BYTES),
    ))
}

/// Step over the varint starting at `pos` without accumulating its value.
///
/// Scans for the byte with the continuation bit clear. Accepts and rejects
/// exactly the inputs `decode_varint` does.
pub fn skip_varint(bytes: &[u8], pos: usize) -> io::Result<usize> {
    for i in 0..MAX_VARINT_BYTES {
        let byte = *bytes.get(pos + i).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("Truncated varint at offset {}", pos),
            )
        })?;
        if i == MAX_VARINT_BYTES - 1 && byte & !LAST_BYTE_MASK != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Varint at offset {} overflows u32", pos),
            ));
        }
        if byte & 0x80 == 0 {
            return Ok(pos + i + 1);
        }
    }

    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("Varint at offset {} exceeds {} bytes", pos, MAX_VARINT_BYTES),
    ))
}


// ============================================================================
// KANI MODEL CHECKING PROOFS
// ============================================================================
//
// Run with: cargo kani
//
// Verified properties:
// 1. encode_varint never panics and writes 1..=MAX_VARINT_BYTES bytes
// 2. decode_varint never panics for any byte sequence
// 3. Roundtrip: decode(encode(x)) == x for all u32

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    #[kani::proof]
    fn verify_encode_varint_bounds() {
        let value: u32 = kani::any();
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);

        kani::assert(!buf.is_empty(), "at least one byte");
        kani::assert(buf.len() <= MAX_VARINT_BYTES, "at most MAX_VARINT_BYTES");
        kani::assert(buf.len() == varint_len(value), "varint_len agrees");
        kani::assert(
            buf.last().map_or(false, |&b| b & 0x80 == 0),
            "last byte has no continuation bit",
        );
    }

    #[kani::proof]
    #[kani::unwind(7)]
    fn verify_decode_varint_no_panic() {
        let len: usize = kani::any_where(|&n| n <= MAX_VARINT_BYTES + 1);
        let mut bytes = [0u8; MAX_VARINT_BYTES + 1];
        for i in 0..len {
            bytes[i] = kani::any();
        }

        if let Ok((_, next)) = decode_varint(&bytes[..len], 0) {
            kani::assert(next > 0 && next <= len, "cursor stays in bounds");
        }
    }

    #[kani::proof]
    fn verify_varint_roundtrip() {
        let original: u32 = kani::any();
        let mut buf = Vec::new();
        encode_varint(original, &mut buf);

        let result = decode_varint(&buf, 0);
        kani::assert(result.is_ok(), "decoding an encoded value succeeds");
        let (decoded, next) = result.unwrap();
        kani::assert(decoded == original, "roundtrip preserves value");
        kani::assert(next == buf.len(), "consumes exactly the encoded bytes");
    }
}
