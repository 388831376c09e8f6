// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use freqidx::binary::container::VERSION;
use freqidx::binary::{Container, ContainerFooter, ContainerHeader};
use freqidx::{
    build_outcomes, query_index, verify_index, BatchSummary, BuildOutcome, FrequencyIndex,
    IndexBuilder,
};

mod cli;
use cli::display::*;
use cli::{read_blocks, resolve_costs, Cli, Commands};

fn init_tracing() {
    // FREQIDX_LOG wins over RUST_LOG; default keeps the terminal quiet
    let filter = EnvFilter::try_from_env("FREQIDX_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(std::env::var_os("NO_COLOR").is_none())
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            input,
            output,
            access_cost,
            skip_cost,
            config,
        } => run_build(
            input.as_deref(),
            &output,
            access_cost,
            skip_cost,
            config.as_deref(),
        ),
        Commands::Query { file, value, block } => run_query(&file, value, block),
        Commands::Inspect { file } => run_inspect(&file),
        Commands::Verify { file } => run_verify(&file),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn load_container(path: &str) -> Result<(Container, usize), String> {
    let bytes = fs::read(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    let container = Container::from_bytes(&bytes).map_err(|e| format!("{}: {}", path, e))?;
    Ok((container, bytes.len()))
}

// ============================================================================
// BUILD
// ============================================================================

fn run_build(
    input: Option<&str>,
    output: &str,
    access_cost: Option<f64>,
    skip_cost: Option<f64>,
    config: Option<&str>,
) -> Result<(), String> {
    let (params, model) = resolve_costs(access_cost, skip_cost, config)?;
    let blocks = read_blocks(input)?;

    let builder = IndexBuilder::new(params).with_model(model);
    info!(
        blocks = blocks.len(),
        ratio = builder.params().ratio(),
        break_even_bytes = builder.model().break_even_bytes(builder.params().ratio()),
        "building indexes"
    );
    let outcomes = build_outcomes(&builder, &blocks).map_err(|e| e.to_string())?;
    let summary = BatchSummary::from_outcomes(&outcomes);

    for (i, (block, outcome)) in blocks.iter().zip(&outcomes).enumerate() {
        match outcome {
            BuildOutcome::Indexed(bytes) => println!(
                "  block {:>4}: {:>7} values → {:>9} index",
                i,
                block.len(),
                format_size(bytes.len())
            ),
            BuildOutcome::Rejected {
                encoded_size,
                break_even_bytes,
            } => println!(
                "  block {:>4}: {:>7} values → {}",
                i,
                block.len(),
                themed(
                    YELLOW,
                    &[],
                    &format!(
                        "no index ({} > {} budget)",
                        format_size(*encoded_size),
                        format_size(*break_even_bytes as usize)
                    )
                )
            ),
        }
    }

    let container = Container::new(outcomes.into_iter().map(BuildOutcome::into_index).collect());
    let bytes = container.to_bytes().map_err(|e| e.to_string())?;
    fs::write(output, &bytes).map_err(|e| format!("Failed to write {}: {}", output, e))?;

    println!(
        "✅ {} blocks: {} indexed, {} rejected → {} ({})",
        summary.blocks,
        summary.indexed,
        summary.rejected,
        output,
        format_size(bytes.len())
    );
    Ok(())
}

// ============================================================================
// QUERY
// ============================================================================

fn run_query(path: &str, value: u32, block: Option<usize>) -> Result<(), String> {
    let (container, _) = load_container(path)?;

    let range = match block {
        Some(i) if i >= container.blocks.len() => {
            return Err(format!(
                "block {} out of range ({} blocks)",
                i,
                container.blocks.len()
            ));
        }
        Some(i) => i..i + 1,
        None => 0..container.blocks.len(),
    };

    for i in range {
        match query_index(value, container.block(i)).map_err(|e| format!("block {}: {}", i, e))? {
            Some(count) => println!("block {}: {}", i, count),
            None => println!("block {}: no index", i),
        }
    }
    Ok(())
}

// ============================================================================
// INSPECT
// ============================================================================

fn run_inspect(path: &str) -> Result<(), String> {
    let (container, total_size) = load_container(path)?;
    let indexed = container.blocks.iter().flatten().count();
    let table_size = container.blocks.len() * 4;

    println!();
    section_top("FQX CONTAINER");
    row(&format!(
        "  {}  v{}  {} blocks ({} indexed)  {}",
        themed(CYAN, &[BOLD], path),
        VERSION,
        container.blocks.len(),
        indexed,
        format_size(total_size)
    ));
    row(&format!(
        "  {} header {:>10}   {} table {:>10}   {} footer {:>10}",
        technique_badge("RAW"),
        format_size(ContainerHeader::SIZE),
        technique_badge("RAW"),
        format_size(table_size),
        technique_badge("CRC"),
        format_size(ContainerFooter::SIZE)
    ));

    for (i, block) in container.blocks.iter().enumerate() {
        section_mid(&format!("BLOCK {}", i));
        let Some(bytes) = block else {
            row(&format!("  {}", themed(GRAY, &[DIM], "no index")));
            continue;
        };

        let index = FrequencyIndex::parse(bytes).map_err(|e| format!("block {}: {}", i, e))?;
        let stats = index.stats().map_err(|e| format!("block {}: {}", i, e))?;
        let raw = usize::try_from(stats.total_occurrences)
            .unwrap_or(usize::MAX)
            .saturating_mul(4);

        row(&format!(
            "  {} distinct   {} singletons   {} overflow   {} values",
            themed(BLUE, &[BOLD], &stats.num_distinct.to_string()),
            stats.singletons,
            stats.overflow_entries,
            stats.total_occurrences
        ));
        row(&format!(
            "  {:<10} {:>10}  {} num_distinct={} counts_offset={}",
            "header",
            format_size(stats.header_bytes),
            technique_badge("RAW"),
            index.num_distinct(),
            index.counts_offset()
        ));
        row(&format!(
            "  {:<10} {:>10}  {} {}",
            "values",
            format_size(stats.values_bytes),
            technique_badge("DELTA"),
            technique_badge("VARINT")
        ));
        row(&format!(
            "  {:<10} {:>10}  {}",
            "bitmap",
            format_size(stats.bitmap_bytes),
            technique_badge("BITMAP")
        ));
        row(&format!(
            "  {:<10} {:>10}  {}",
            "overflow",
            format_size(stats.overflow_bytes),
            technique_badge("VARINT")
        ));
        row(&format!(
            "  {:<10} {:>10}  {} vs raw block",
            "total",
            format_size(stats.total_bytes()),
            pad_left(&savings_colored(raw, stats.total_bytes()), 6)
        ));
    }
    section_bot();
    println!();
    Ok(())
}

// ============================================================================
// VERIFY
// ============================================================================

fn run_verify(path: &str) -> Result<(), String> {
    let (container, _) = load_container(path)?;
    println!("{} CRC32 ok", themed(GREEN, &[], "✓"));

    let mut failures = 0usize;
    for (i, block) in container.blocks.iter().enumerate() {
        let Some(bytes) = block else {
            println!("  block {:>4}: {}", i, themed(GRAY, &[], "no index"));
            continue;
        };
        match verify_index(bytes) {
            Ok(report) => println!(
                "  block {:>4}: {} {} distinct, {} occurrences",
                i,
                themed(GREEN, &[], "ok"),
                report.stats.num_distinct,
                report.stats.total_occurrences
            ),
            Err(e) => {
                failures += 1;
                println!("  block {:>4}: {} {}", i, themed(RED, &[BOLD], "FAIL"), e);
            }
        }
    }

    if failures > 0 {
        return Err(format!(
            "{} of {} blocks failed verification",
            failures,
            container.blocks.len()
        ));
    }
    println!("✅ {} blocks verified", container.blocks.len());
    Ok(())
}
