// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the freqidx command-line interface.
//!
//! Four subcommands: `build` turns JSON value blocks into a `.fqx` container,
//! `query` counts a value in each block, `inspect` draws the layout, and
//! `verify` checks the CRC and every index invariant.

pub mod display;

use std::fs;
use std::io::Read;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use freqidx::{CostConfig, CostModel, CostParams};

#[derive(Parser)]
#[command(
    name = "freqidx",
    about = "Per-block frequency index builder and inspector",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build frequency indexes from a JSON array of values (or array of blocks)
    Build {
        /// Input JSON file (reads stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Output .fqx file
        #[arg(short, long)]
        output: String,

        /// Relative cost of reading a block
        #[arg(long, requires = "skip_cost", conflicts_with = "config")]
        access_cost: Option<f64>,

        /// Relative cost of skipping a block
        #[arg(long, requires = "access_cost", conflicts_with = "config")]
        skip_cost: Option<f64>,

        /// JSON cost configuration file
        ///
        /// `{"access_cost": 1.0, "skip_cost": 1000.0}` with an optional
        /// `estimated_queries_per_block` override.
        #[arg(long)]
        config: Option<String>,
    },

    /// Count occurrences of a value in each block of a .fqx file
    Query {
        /// Path to .fqx file
        file: String,

        /// Value to count
        value: u32,

        /// Only query this block (0-based)
        #[arg(short, long)]
        block: Option<usize>,
    },

    /// Inspect a .fqx file structure
    Inspect {
        /// Path to .fqx file
        file: String,
    },

    /// Check CRC and index invariants of a .fqx file
    Verify {
        /// Path to .fqx file
        file: String,
    },
}

/// Build input: one block or many.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum BlockInput {
    Single(Vec<u32>),
    Many(Vec<Vec<u32>>),
}

impl BlockInput {
    pub fn into_blocks(self) -> Vec<Vec<u32>> {
        match self {
            BlockInput::Single(values) => vec![values],
            BlockInput::Many(blocks) => blocks,
        }
    }
}

/// Read blocks from `path`, or stdin when `None`.
pub fn read_blocks(path: Option<&str>) -> Result<Vec<Vec<u32>>, String> {
    let raw = match path {
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?
        }
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            raw
        }
    };
    let input: BlockInput =
        serde_json::from_str(&raw).map_err(|e| format!("Invalid values JSON: {}", e))?;
    Ok(input.into_blocks())
}

/// Resolve cost parameters from flags or a config file.
pub fn resolve_costs(
    access_cost: Option<f64>,
    skip_cost: Option<f64>,
    config: Option<&str>,
) -> Result<(CostParams, CostModel), String> {
    if let Some(path) = config {
        let json =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config {}: {}", path, e))?;
        let config =
            CostConfig::from_json(&json).map_err(|e| format!("Invalid cost config: {}", e))?;
        return Ok((config.params, config.model()));
    }

    match (access_cost, skip_cost) {
        (Some(a), Some(s)) => CostParams::new(a, s)
            .map(|params| (params, CostModel::default()))
            .map_err(|e| e.to_string()),
        _ => Err("Either --access-cost and --skip-cost, or --config, is required".to_string()),
    }
}
