//! `huff -i infile -o outfile [-v] [--print-tree]`

use std::process::ExitCode;

use clap::Parser;
use huffc::config::{Config, HuffArgs};
use huffc::logging::init_logging;

fn main() -> ExitCode {
    let config = match Config::from_huff_args(HuffArgs::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("huff: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(config.log_filter()) {
        eprintln!("huff: {e:#}");
    }

    match huffc::run_huff(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("huff: {e:#}");
            ExitCode::FAILURE
        }
    }
}
