// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The verification layer: full-format checks and runtime contracts.
//!
//! Two complementary approaches to catching bugs:
//!
//! 1. **`verify_index`** decodes an index end to end and reports the first
//!    broken invariant. Use it on bytes that came back from storage.
//!
//! 2. **Runtime contracts** (`crate::contracts`) that panic in debug builds
//!    when the builder produces something it should not have. Zero-cost in
//!    release.

mod types;

pub use types::*;
