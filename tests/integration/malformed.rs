//! Malformed index bytes: errors, never panics or wrong counts.

use proptest::prelude::*;

use freqidx::{query_index, verify_index, Error, FrequencyIndex, InvariantError};

use crate::common::{build_accepted, occurrences};

#[test]
fn test_every_truncation_is_detected() {
    let values = [1, 1, 300, 300, 300, 70_000, 9, 9, 9, 9, 9, 9];
    let index = build_accepted(&values);
    let counts = occurrences(&values);

    for cut in 0..index.len() {
        let prefix = &index[..cut];
        assert!(verify_index(prefix).is_err(), "prefix of {} bytes verified", cut);

        // A query either errors or still gives the right answer
        for (&value, &count) in &counts {
            if let Ok(answer) = query_index(value, Some(prefix)) {
                assert_eq!(answer, if cut == 0 { None } else { Some(count) });
            }
        }
    }
}

#[test]
fn test_counts_offset_inside_header() {
    let index = [1, 0, 0, 0, 4, 0, 0, 0, 5, 0, 1];
    assert!(query_index(5, Some(&index[..])).is_err());
    assert!(matches!(verify_index(&index), Err(Error::Io(_))));
}

#[test]
fn test_num_distinct_larger_than_values_section() {
    let index = [200, 0, 0, 0, 9, 0, 0, 0, 5, 0, 1];
    assert!(FrequencyIndex::parse(&index).is_err());
}

#[test]
fn test_biased_overflow_exceeding_u32() {
    // Stored count u32::MAX would decode to u32::MAX + 2
    let index = [1, 0, 0, 0, 9, 0, 0, 0, 5, 0, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F];
    assert!(query_index(5, Some(&index[..])).is_err());
    assert!(query_index(4, Some(&index[..])).is_ok());
    assert!(verify_index(&index).is_err());
}

#[test]
fn test_corrupt_overflow_entry_cannot_be_skipped() {
    // Values 1 and 2, both overflow. The first entry's fifth byte sets bits above u32,
    // the second is a valid 5 (count 7).
    let index = [
        2, 0, 0, 0, 10, 0, 0, 0, 1, 1, 0b00, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F, 5,
    ];
    assert!(query_index(1, Some(&index[..])).is_err());
    assert!(query_index(2, Some(&index[..])).is_err());
    assert_eq!(query_index(0, Some(&index[..])).unwrap(), Some(0));
    assert!(verify_index(&index).is_err());
}

#[test]
fn test_hand_corrupted_invariants() {
    // Duplicate value via zero delta
    let unsorted = [2, 0, 0, 0, 10, 0, 0, 0, 5, 0, 0b11];
    assert!(matches!(
        verify_index(&unsorted),
        Err(Error::Invariant(InvariantError::UnsortedValues { .. }))
    ));

    // Trailing garbage after the overflow stream
    let trailing = [1, 0, 0, 0, 9, 0, 0, 0, 5, 0b1, 0x42];
    assert!(matches!(
        verify_index(&trailing),
        Err(Error::Invariant(InvariantError::TrailingBytes { count: 1 }))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Arbitrary bytes never panic the reader.
    #[test]
    fn prop_arbitrary_bytes_never_panic(
        bytes in prop::collection::vec(any::<u8>(), 0..64),
        probe: u32,
    ) {
        let _ = query_index(probe, Some(&bytes[..]));
        let _ = verify_index(&bytes);
        if let Ok(index) = FrequencyIndex::parse(&bytes) {
            let _ = index.stats();
            for item in index.entries() {
                if item.is_err() {
                    break;
                }
            }
        }
    }

    /// Flipping one byte of a valid index never panics.
    #[test]
    fn prop_single_byte_corruption_never_panics(
        values in prop::collection::vec(0u32..1000, 1..100),
        at in any::<prop::sample::Index>(),
        mask in 1u8..=255,
        probe in 0u32..1000,
    ) {
        let mut index = build_accepted(&values);
        let i = at.index(index.len());
        index[i] ^= mask;
        let _ = query_index(probe, Some(index.as_slice()));
        let _ = verify_index(&index);
    }
}
