//! Command-line configuration for `huff` and `dehuff`.
//!
//! Both tools take a resolved input path and output path and hand them to
//! the core. Argument errors and `-h` are handled by clap.

use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::{ArgAction, Args, Parser};

/// Options shared by both tools.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Input file
    #[arg(short = 'i', long = "input", value_name = "INFILE")]
    pub input: PathBuf,

    /// Output file (created or truncated)
    #[arg(short = 'o', long = "output", value_name = "OUTFILE")]
    pub output: PathBuf,

    /// Print size statistics; repeat for debug (-vv) or trace (-vvv) logs
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

/// Compress a file with Huffman coding.
#[derive(Parser, Debug, Clone)]
#[command(name = "huff", version, about, long_about = None)]
pub struct HuffArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Print the code tree before compressing
    #[arg(long)]
    pub print_tree: bool,
}

/// Decompress a file produced by huff.
#[derive(Parser, Debug, Clone)]
#[command(name = "dehuff", version, about, long_about = None)]
pub struct DehuffArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Complete configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // === Files ===
    /// File to read
    pub input: PathBuf,

    /// File to write
    pub output: PathBuf,

    // === Behavior ===
    /// Verbosity level (0 = quiet, 1 = stats, 2+ = debug logs)
    pub verbose: u8,

    /// Whether to print the code tree (huff only)
    pub print_tree: bool,
}

impl Config {
    fn from_common(common: CommonArgs, print_tree: bool) -> Result<Self> {
        let config = Config {
            input: common.input,
            output: common.output,
            verbose: common.verbose,
            print_tree,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_huff_args(args: HuffArgs) -> Result<Self> {
        Self::from_common(args.common, args.print_tree)
    }

    pub fn from_dehuff_args(args: DehuffArgs) -> Result<Self> {
        Self::from_common(args.common, false)
    }

    /// Reject configurations that would destroy the input.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.input != self.output,
            "input and output are the same file: {}",
            self.input.display()
        );
        Ok(())
    }

    /// Whether to print the statistics summary.
    pub fn print_stats(&self) -> bool {
        self.verbose > 0
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 | 1 => "warn",
            2 => "debug",
            _ => "trace",
        }
    }
}
