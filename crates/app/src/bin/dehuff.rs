//! `dehuff -i infile -o outfile [-v]`

use std::process::ExitCode;

use clap::Parser;
use huffc::config::{Config, DehuffArgs};
use huffc::logging::init_logging;

fn main() -> ExitCode {
    let config = match Config::from_dehuff_args(DehuffArgs::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("dehuff: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(config.log_filter()) {
        eprintln!("dehuff: {e:#}");
    }

    match huffc::run_dehuff(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("dehuff: {e:#}");
            ExitCode::FAILURE
        }
    }
}
