//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use signup_probe::Marker;
use std::path::PathBuf;

/// signup-probe: end-to-end checks for the SwiftAssess signup form
#[derive(Parser, Debug)]
#[command(name = "signup-probe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run signup cases and write reports
    Test(TestArgs),

    /// List the case catalog with markers
    List(ListArgs),
}

/// Arguments for the test command
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct TestArgs {
    /// Only run cases carrying one of these markers
    #[arg(short, long = "marker", value_enum)]
    pub markers: Vec<MarkerArg>,

    /// Only run cases whose name contains this text ("not <text>" excludes)
    #[arg(short = 'k', long)]
    pub filter: Option<String>,

    /// Report directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Failure screenshot directory
    #[arg(long)]
    pub screenshots: Option<PathBuf>,

    /// Re-run count for every case, overriding per-case values
    #[arg(long)]
    pub reruns: Option<u32>,

    /// Stop after the first failed case
    #[arg(long)]
    pub fail_fast: bool,

    /// Browser backend
    #[arg(long, value_enum)]
    pub driver: Option<DriverArg>,

    /// Site under test (overrides BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Run the browser without a window (also set by HEADLESS or CI)
    #[arg(long)]
    pub headless: bool,

    /// Element wait in seconds (overrides DEFAULT_TIMEOUT)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Summary format printed to stdout
    #[arg(long, value_enum, default_value = "text")]
    pub format: FormatArg,

    /// Leave steps and labels out of the reports
    #[arg(long)]
    pub no_annotations: bool,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only list cases carrying one of these markers
    #[arg(short, long = "marker", value_enum)]
    pub markers: Vec<MarkerArg>,

    /// Only list cases whose name contains this text
    #[arg(short = 'k', long)]
    pub filter: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Case marker
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerArg {
    /// Smoke tests for critical functionality
    Smoke,
    /// Regression tests
    Regression,
    /// Mobile responsive tests
    Mobile,
    /// Security related tests
    Security,
}

impl From<MarkerArg> for Marker {
    fn from(arg: MarkerArg) -> Self {
        match arg {
            MarkerArg::Smoke => Self::Smoke,
            MarkerArg::Regression => Self::Regression,
            MarkerArg::Mobile => Self::Mobile,
            MarkerArg::Security => Self::Security,
        }
    }
}

/// Browser backend
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverArg {
    /// Real Chromium over CDP
    Chromium,
    /// In-memory reproduction of the signup form
    Simulated,
}

impl DriverArg {
    /// Backend used when none is given
    #[must_use]
    pub const fn default_for_build() -> Self {
        if cfg!(feature = "browser") {
            Self::Chromium
        } else {
            Self::Simulated
        }
    }
}

/// Summary output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON report on stdout
    Json,
    /// HTML report on stdout
    Html,
}

/// Color output argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
