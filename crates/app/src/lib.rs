//! huff / dehuff: command-line front ends for huffc-core.
//!
//! Each tool resolves its paths through [`config::Config`] and hands them to
//! the core file pipelines. Failures carry the phase and path as context.

pub mod config;
pub mod logging;

use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use huffc_core::{compress_file, decompress_file, fill_histogram, Error, HuffmanTree, Stats};
use tracing::{info, warn};

use crate::config::Config;

/// Build the code tree for `config.input` and print it to stdout.
fn print_tree(config: &Config) -> Result<()> {
    let file = File::open(&config.input)
        .map_err(|e| Error::open(&config.input, e))
        .context("reading input for tree")?;
    let (histogram, _) = fill_histogram(&mut BufReader::new(file))
        .with_context(|| format!("scanning {}", config.input.display()))?;
    let tree = HuffmanTree::build(&histogram).context("building code tree")?;
    print!("{tree}");
    Ok(())
}

/// Remove `config.output` after a failed run.
///
/// Open failures happen before the output exists, so they leave nothing behind.
fn remove_partial_output(config: &Config, error: &Error) {
    if matches!(error, Error::Open { .. }) {
        return;
    }
    if let Err(remove_err) = std::fs::remove_file(&config.output) {
        warn!(
            output = %config.output.display(),
            error = %remove_err,
            "could not remove partial output"
        );
    }
}

/// Compress `config.input` into `config.output`.
///
/// A partially written output is removed when compression fails.
pub fn run_huff(config: &Config) -> Result<Stats> {
    if config.print_tree {
        print_tree(config)?;
    }

    let stats = compress_file(&config.input, &config.output)
        .inspect_err(|e| remove_partial_output(config, e))
        .with_context(|| {
            format!(
                "compressing {} into {}",
                config.input.display(),
                config.output.display()
            )
        })?;

    info!(
        uncompressed = stats.uncompressed_bytes,
        compressed = stats.compressed_bytes,
        leaves = stats.leaf_count,
        "compression finished"
    );
    if config.print_stats() {
        stats.print_summary();
    }
    Ok(stats)
}

/// Decompress `config.input` into `config.output`.
///
/// A partially written output is removed when decoding fails.
pub fn run_dehuff(config: &Config) -> Result<Stats> {
    let stats = decompress_file(&config.input, &config.output)
        .inspect_err(|e| remove_partial_output(config, e))
        .with_context(|| {
            format!(
                "decompressing {} into {}",
                config.input.display(),
                config.output.display()
            )
        })?;

    info!(
        uncompressed = stats.uncompressed_bytes,
        compressed = stats.compressed_bytes,
        "decompression finished"
    );
    if config.print_stats() {
        stats.print_summary();
    }
    Ok(stats)
}
