//! Varint codec properties.

use proptest::prelude::*;

use freqidx::binary::{decode_varint, encode_varint, skip_varint, varint_len, MAX_VARINT_BYTES};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Property: varint encoding is reversible for all u32 values.
    #[test]
    fn prop_varint_roundtrip(value: u32) {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        let (decoded, next) = decode_varint(&buf, 0).unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert_eq!(next, buf.len());
        prop_assert_eq!(skip_varint(&buf, 0).unwrap(), buf.len());
    }

    /// Property: 1..=5 bytes, agreeing with `varint_len`.
    #[test]
    fn prop_varint_size_bound(value: u32) {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        prop_assert!(!buf.is_empty() && buf.len() <= MAX_VARINT_BYTES);
        prop_assert_eq!(buf.len(), varint_len(value));
    }

    /// Property: a stream of varints decodes back in order.
    #[test]
    fn prop_varint_stream(values in prop::collection::vec(any::<u32>(), 0..100)) {
        let mut buf = Vec::new();
        for &v in &values {
            encode_varint(v, &mut buf);
        }
        let mut pos = 0;
        for &v in &values {
            let (decoded, next) = decode_varint(&buf, pos).unwrap();
            prop_assert_eq!(decoded, v);
            pos = next;
        }
        prop_assert_eq!(pos, buf.len());
    }

    /// Property: any strict prefix of a multi-byte varint is truncated, not misread.
    #[test]
    fn prop_varint_prefix_errors(value in 128u32..) {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        for cut in 0..buf.len() {
            prop_assert!(decode_varint(&buf[..cut], 0).is_err());
        }
    }
}
