//! Varint codec: length boundaries, continuation bits, and rejection of bad input.

use std::io::ErrorKind;

use freqidx::binary::{decode_varint, encode_varint, skip_varint, varint_len, MAX_VARINT_BYTES};

fn encoded(value: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_varint(value, &mut buf);
    buf
}

// ============================================================================
// LENGTHS
// ============================================================================

#[test]
fn test_length_boundaries() {
    let cases = [
        (0u32, 1usize),
        (127, 1),
        (128, 2),
        (16_383, 2),
        (16_384, 3),
        ((1 << 21) - 1, 3),
        (1 << 21, 4),
        ((1 << 28) - 1, 4),
        (1 << 28, 5),
        (u32::MAX, 5),
    ];
    for (value, len) in cases {
        assert_eq!(encoded(value).len(), len, "encoded length of {}", value);
        assert_eq!(varint_len(value), len, "varint_len of {}", value);
    }
}

#[test]
fn test_known_encodings() {
    assert_eq!(encoded(0), vec![0x00]);
    assert_eq!(encoded(1), vec![0x01]);
    assert_eq!(encoded(300), vec![0xAC, 0x02]);
    assert_eq!(encoded(u32::MAX), vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
}

#[test]
fn test_continuation_bits() {
    let buf = encoded(u32::MAX);
    assert_eq!(buf.len(), MAX_VARINT_BYTES);
    for byte in &buf[..buf.len() - 1] {
        assert!(byte & 0x80 != 0);
    }
    assert_eq!(buf[buf.len() - 1] & 0x80, 0);
}

// ============================================================================
// DECODING
// ============================================================================

#[test]
fn test_decode_at_offset() {
    let mut buf = vec![0xEE];
    encode_varint(300, &mut buf);
    encode_varint(7, &mut buf);

    let (first, next) = decode_varint(&buf, 1).unwrap();
    assert_eq!((first, next), (300, 3));
    let (second, end) = decode_varint(&buf, next).unwrap();
    assert_eq!((second, end), (7, 4));
    assert_eq!(skip_varint(&buf, 1).unwrap(), 3);
}

#[test]
fn test_truncated_is_eof() {
    let err = decode_varint(&[0x80, 0x80], 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);

    let err = skip_varint(&[0xFF], 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);

    let err = decode_varint(&[], 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
}

#[test]
fn test_u32_overflow_rejected() {
    // Fifth byte may only carry the top four bits
    let err = decode_varint(&[0xFF, 0xFF, 0xFF, 0xFF, 0x10], 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[test]
fn test_overlong_rejected() {
    let err = decode_varint(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x00], 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);

    let err = skip_varint(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x00], 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[test]
fn test_skip_and_decode_agree_on_overflow() {
    let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0x7F];
    assert_eq!(decode_varint(&bytes, 0).unwrap_err().kind(), ErrorKind::InvalidData);
    assert_eq!(skip_varint(&bytes, 0).unwrap_err().kind(), ErrorKind::InvalidData);
}
