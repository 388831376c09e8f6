// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types for building, querying and persisting frequency indexes.
//!
//! Rejection by the cost model is not an error (see `BuildOutcome`), and
//! neither is a missing index or a value that does not occur. Everything here
//! is either a bad input to the builder or bytes that do not follow the format.

use std::io;

use thiserror::Error;

use crate::verify::InvariantError;

/// Error variants for frequency index operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed index bytes: truncated varint, offset outside the buffer, etc.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Access or skip cost is zero, negative, NaN or infinite.
    #[error("invalid cost parameters: access_cost={access_cost}, skip_cost={skip_cost} (both must be finite and > 0)")]
    InvalidCostParams { access_cost: f64, skip_cost: f64 },

    /// The configured query estimate is zero, negative, NaN or infinite.
    #[error("invalid cost model: estimated_queries_per_block={estimated_queries_per_block} (must be finite and > 0)")]
    InvalidCostModel { estimated_queries_per_block: f64 },

    /// The block cannot be described with 32-bit counts and offsets.
    #[error("block of {len} values is too large to index")]
    BlockTooLarge { len: usize },

    /// An encoded index decoded cleanly but breaks a format invariant.
    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantError),

    /// The `.fqx` container is damaged or has the wrong shape.
    #[error("container error: {0}")]
    Container(String),
}

/// A specialized Result type for frequency index operations.
pub type Result<T> = std::result::Result<T, Error>;
