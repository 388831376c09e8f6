// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Admission policy: is this index worth keeping?
//!
//! An index costs bytes on every read of the block's metadata, and it saves a
//! full scan every time a query can be answered from it. The model guesses
//! how many queries a block will see, scales by how expensive a scan is
//! relative to skipping, and turns that into a byte budget:
//!
//! ```text
//! break_even_bytes = estimated_queries_per_block × (access_cost / skip_cost) × bytes_per_kib
//! accept            ⇔ encoded_size ≤ break_even_bytes
//! ```
//!
//! This is a heuristic filter, not an accounting. The constants are exposed
//! on `CostModel` so tests and config files can move them without touching
//! the codec.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Expected number of point queries against one block over its lifetime.
pub const ESTIMATED_QUERIES_PER_BLOCK: f64 = 550.0;

/// Scales the cost ratio (a per-KiB figure) into bytes.
pub const BYTES_PER_KIB: f64 = 1024.0;

// ============================================================================
// COST PARAMETERS
// ============================================================================

/// Caller-supplied storage costs for one build.
///
/// Both costs are finite and strictly positive; `new` and deserialization
/// refuse anything else, so `ratio()` is always a finite positive number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCostParams")]
pub struct CostParams {
    access_cost: f64,
    skip_cost: f64,
}

#[derive(Deserialize)]
struct RawCostParams {
    access_cost: f64,
    skip_cost: f64,
}

impl TryFrom<RawCostParams> for CostParams {
    type Error = Error;

    fn try_from(raw: RawCostParams) -> Result<Self> {
        Self::new(raw.access_cost, raw.skip_cost)
    }
}

impl CostParams {
    pub fn new(access_cost: f64, skip_cost: f64) -> Result<Self> {
        let valid = |c: f64| c.is_finite() && c > 0.0;
        if !valid(access_cost) || !valid(skip_cost) {
            return Err(Error::InvalidCostParams {
                access_cost,
                skip_cost,
            });
        }
        Ok(Self {
            access_cost,
            skip_cost,
        })
    }

    pub fn access_cost(&self) -> f64 {
        self.access_cost
    }

    pub fn skip_cost(&self) -> f64 {
        self.skip_cost
    }

    /// `access_cost / skip_cost`
    #[inline]
    pub fn ratio(&self) -> f64 {
        self.access_cost / self.skip_cost
    }
}

// ============================================================================
// COST MODEL
// ============================================================================

/// Break-even constants for the admission check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    pub estimated_queries_per_block: f64,
    pub bytes_per_kib: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            estimated_queries_per_block: ESTIMATED_QUERIES_PER_BLOCK,
            bytes_per_kib: BYTES_PER_KIB,
        }
    }
}

impl CostModel {
    /// Largest encoded size (bytes) that still pays for itself at `cost_ratio`.
    #[inline]
    pub fn break_even_bytes(&self, cost_ratio: f64) -> f64 {
        self.estimated_queries_per_block * cost_ratio * self.bytes_per_kib
    }

    /// Whether an index of `encoded_size` bytes should be kept.
    #[inline]
    pub fn accept(&self, encoded_size: usize, cost_ratio: f64) -> bool {
        encoded_size as f64 <= self.break_even_bytes(cost_ratio)
    }
}

/// `CostModel::default().accept(..)`
#[inline]
pub fn accept(encoded_size: usize, cost_ratio: f64) -> bool {
    CostModel::default().accept(encoded_size, cost_ratio)
}

// ============================================================================
// CONFIG FILE
// ============================================================================

/// On-disk cost configuration (JSON).
///
/// ```json
/// { "access_cost": 1.0, "skip_cost": 1000.0, "estimated_queries_per_block": 550.0 }
/// ```
///
/// `estimated_queries_per_block` is optional and falls back to the default.
/// Unknown keys are an error, and every number must be finite and > 0.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawCostConfig")]
pub struct CostConfig {
    pub params: CostParams,
    pub estimated_queries_per_block: Option<f64>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCostConfig {
    access_cost: f64,
    skip_cost: f64,
    #[serde(default)]
    estimated_queries_per_block: Option<f64>,
}

impl TryFrom<RawCostConfig> for CostConfig {
    type Error = Error;

    fn try_from(raw: RawCostConfig) -> Result<Self> {
        let params = CostParams::new(raw.access_cost, raw.skip_cost)?;
        if let Some(q) = raw.estimated_queries_per_block {
            if !(q.is_finite() && q > 0.0) {
                return Err(Error::InvalidCostModel {
                    estimated_queries_per_block: q,
                });
            }
        }
        Ok(Self {
            params,
            estimated_queries_per_block: raw.estimated_queries_per_block,
        })
    }
}

impl CostConfig {
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn model(&self) -> CostModel {
        let mut model = CostModel::default();
        if let Some(q) = self.estimated_queries_per_block {
            model.estimated_queries_per_block = q;
        }
        model
    }
}
