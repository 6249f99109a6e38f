//! CLI entry point for the slice compositor

use clap::Parser;
use slicecomp::io::cli::{Cli, CommandProcessor, init_logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut processor = CommandProcessor::new(cli);
    match processor.process() {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::from(error.exit_code())
        }
    }
}
