//! signup-probe CLI library
//!
//! Argument parsing, configuration layering, progress output and suite
//! execution behind the `signup-probe` binary.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, DriverArg, FormatArg, ListArgs, MarkerArg, TestArgs};
pub use config::{suite_config, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_case_json, render_case_table, ProgressReporter};
pub use runner::{list_cases, run_tests, SuiteOutcome};
