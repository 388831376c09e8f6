//! End-to-end build/query scenarios with exact byte layouts.

use freqidx::{build_index, query_index, BuildOutcome, FrequencyIndex, IndexBuilder};

use crate::common::{header_fields, realistic_params};

#[test]
fn test_empty_block_is_header_only() {
    let index = build_index(&[], &realistic_params()).unwrap().unwrap();

    assert_eq!(index.len(), 8);
    assert_eq!(header_fields(&index), (0, 8));
    assert_eq!(query_index(0, Some(index.as_slice())).unwrap(), Some(0));
    assert_eq!(query_index(u32::MAX, Some(index.as_slice())).unwrap(), Some(0));
}

#[test]
fn test_repeated_value_uses_overflow() {
    let index = build_index(&[5, 5, 5], &realistic_params()).unwrap().unwrap();

    // header | value 5 | bitmap 0 | overflow 3 - 2
    assert_eq!(index, vec![1, 0, 0, 0, 9, 0, 0, 0, 5, 0b0, 1]);
    assert_eq!(query_index(5, Some(index.as_slice())).unwrap(), Some(3));
    assert_eq!(query_index(6, Some(index.as_slice())).unwrap(), Some(0));
}

#[test]
fn test_all_singletons_have_no_overflow() {
    let index = build_index(&[4, 2, 3, 1], &realistic_params()).unwrap().unwrap();

    // Sorted: first value 1, then three deltas of 1
    assert_eq!(index, vec![4, 0, 0, 0, 12, 0, 0, 0, 1, 1, 1, 1, 0b1111]);
    let stats = FrequencyIndex::parse(&index).unwrap().stats().unwrap();
    assert_eq!(stats.singletons, 4);
    assert_eq!(stats.overflow_bytes, 0);
    assert_eq!(query_index(3, Some(index.as_slice())).unwrap(), Some(1));
}

#[test]
fn test_large_block_rejected_at_tight_ratio() {
    let values: Vec<u32> = (0..5_000).map(|v| v * 3).collect();
    let outcome = IndexBuilder::new(realistic_params()).build(&values).unwrap();

    match outcome {
        BuildOutcome::Rejected {
            encoded_size,
            break_even_bytes,
        } => {
            assert!(encoded_size as f64 > break_even_bytes);
            assert_eq!(break_even_bytes, 550.0 * 0.001 * 1024.0);
        }
        BuildOutcome::Indexed(_) => panic!("5000 distinct values should not fit 563 bytes"),
    }

    let index = build_index(&values, &realistic_params()).unwrap();
    assert!(index.is_none());
    assert_eq!(query_index(3, index.as_deref()).unwrap(), None);
}

#[test]
fn test_early_exit_past_predicate() {
    let index = build_index(&[100], &realistic_params()).unwrap().unwrap();
    let view = FrequencyIndex::parse(&index).unwrap();

    assert_eq!(view.position_of(50).unwrap(), None);
    assert_eq!(query_index(50, Some(index.as_slice())).unwrap(), Some(0));
    assert_eq!(query_index(100, Some(index.as_slice())).unwrap(), Some(1));
    assert_eq!(query_index(101, Some(index.as_slice())).unwrap(), Some(0));
}

#[test]
fn test_extreme_values() {
    let values = [u32::MAX, 0, u32::MAX, 1 << 28];
    let index = build_index(&values, &realistic_params()).unwrap().unwrap();

    assert_eq!(query_index(0, Some(index.as_slice())).unwrap(), Some(1));
    assert_eq!(query_index(1 << 28, Some(index.as_slice())).unwrap(), Some(1));
    assert_eq!(query_index(u32::MAX, Some(index.as_slice())).unwrap(), Some(2));
    assert_eq!(query_index(u32::MAX - 1, Some(index.as_slice())).unwrap(), Some(0));
}
