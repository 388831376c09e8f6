// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Build/query differential fuzzing plus queries over raw bytes.
//!
//! Two modes, chosen by the input:
//! - a block of values: build it, then every probe must match a direct scan
//! - raw bytes: query and verify must return Ok or Err, never panic

#![no_main]

use arbitrary::Arbitrary;
use freqidx::{build_index, query_index, verify_index, CostParams};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Input {
    Block { values: Vec<u32>, probes: Vec<u32> },
    Raw { bytes: Vec<u8>, probe: u32 },
}

fuzz_target!(|input: Input| {
    match input {
        Input::Block { values, probes } => {
            let params = CostParams::new(1.0, 1.0).expect("valid costs");
            let Ok(Some(index)) = build_index(&values, &params) else {
                return;
            };
            verify_index(&index).expect("built index should verify");

            for probe in values.iter().chain(&probes).copied() {
                let expected = values.iter().filter(|&&v| v == probe).count() as u32;
                assert_eq!(
                    query_index(probe, Some(index.as_slice())).expect("query on built index"),
                    Some(expected),
                    "count mismatch for {}",
                    probe
                );
            }
        }
        Input::Raw { bytes, probe } => {
            let verified = verify_index(&bytes).is_ok();
            let answer = query_index(probe, Some(bytes.as_slice()));
            // A fully verified index answers every query
            if verified {
                assert!(answer.is_ok(), "verified index failed query: {:?}", answer);
            }
        }
    }
});
