//! Command-line interface for the navigraph demos.
//!
//! `self-recall` builds an index over uniform random vectors and reports how
//! often each stored vector finds itself; `query` prints the nearest
//! neighbours of a random query.

mod commands;

pub use commands::{
    Cli, CliError, Command, IndexArgs, QueryCommand, QueryReport, Report, SelfRecallCommand,
    SelfRecallReport, render_report, run_cli,
};

#[cfg(test)]
mod tests;
