// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `.fqx` container parsing under adversarial input.
//!
//! Length tables that point past the end, block counts near u32::MAX, CRCs
//! that lie. None of it should crash, and whatever parses must re-serialize
//! to the same blocks.

#![no_main]

use freqidx::binary::Container;
use freqidx::query_index;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(container) = Container::from_bytes(data) else {
        return;
    };

    // Flags and reserved bytes are not preserved, payloads are
    let bytes = container.to_bytes().expect("parsed container should serialize");
    assert_eq!(bytes.len(), data.len());
    let reparsed = Container::from_bytes(&bytes).expect("re-serialized container should parse");
    assert_eq!(reparsed, container, "container did not round-trip");

    for i in 0..container.blocks.len() {
        let _ = query_index(0, container.block(i));
    }
});
