//! Shared plumbing for the command-line binaries.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::error::{CasError, Result};
use crate::threephase::{ReportOptions, find};

/// Log to stderr, filtered by `RUST_LOG` (default `warn`), so stdout carries only results.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Solve one catalogued problem and print its reported unknowns.
pub fn run_problem(id: &str) -> Result<()> {
    init_tracing();
    let derivation = find(id)?.solve()?;
    for line in derivation.report(ReportOptions::default())? {
        println!("{line}");
    }
    Ok(())
}

/// Line printed on stderr when a command fails.
pub fn failure_message(err: &CasError) -> String {
    format!("error: {err}")
}

/// Exit status for a finished command, printing the error message on failure.
pub fn finish(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", failure_message(&err));
            ExitCode::FAILURE
        }
    }
}
