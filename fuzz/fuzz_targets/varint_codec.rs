// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for varint (LEB128) encoding/decoding.
//!
//! Every value and every delta in an index is a varint. Decode must return
//! Err on garbage, and anything it accepts must re-encode to the same bytes.

#![no_main]

use freqidx::binary::{decode_varint, encode_varint, skip_varint, MAX_VARINT_BYTES};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let decoded = decode_varint(data, 0);

    // skip and decode succeed or fail together, and agree on where the varint ends
    match (&decoded, skip_varint(data, 0)) {
        (Ok((_, end)), Ok(skipped)) => assert_eq!(*end, skipped),
        (Ok(_), Err(e)) => panic!("skip failed where decode succeeded: {}", e),
        (Err(e), Ok(skipped)) => panic!("skip reached {} where decode failed: {}", skipped, e),
        (Err(d), Err(s)) => assert_eq!(d.kind(), s.kind()),
    }

    if let Ok((value, consumed)) = decoded {
        assert!(consumed >= 1 && consumed <= MAX_VARINT_BYTES);

        let mut reencoded = Vec::new();
        encode_varint(value, &mut reencoded);
        let (redecoded, reconsumed) =
            decode_varint(&reencoded, 0).expect("re-encoded varint should decode");
        assert_eq!(value, redecoded);
        assert_eq!(reconsumed, reencoded.len());

        // Non-canonical input (padding bytes) may be longer, never shorter
        assert!(reencoded.len() <= consumed);
    }
});
