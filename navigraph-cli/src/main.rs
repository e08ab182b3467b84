//! `navigraph` binary.
//!
//! Installs logging, runs the parsed command and prints its report. Failures
//! are logged with their stable error code and turn into a failing exit
//! status.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, field};

use navigraph_cli::{
    cli::{Cli, CliError, Report, render_report, run_cli},
    logging::{LoggingError, init_logging},
};

fn print(report: &Report) -> Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());
    render_report(report, &mut out).context("failed to render report")?;
    out.flush().context("failed to flush stdout")
}

fn run() -> Result<()> {
    let report = run_cli(Cli::parse()).context("command failed")?;
    print(&report)
}

fn main() -> ExitCode {
    if let Err(err) = init_logging() {
        logging_unavailable(&err);
        return ExitCode::FAILURE;
    }
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.downcast_ref::<CliError>().map(CliError::code);
            error!(error = %format!("{err:#}"), code = code.map(field::display), "navigraph failed");
            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "tracing is not installed when logging setup fails"
)]
fn logging_unavailable(err: &LoggingError) {
    eprintln!("navigraph: cannot initialise logging: {err}");
}
