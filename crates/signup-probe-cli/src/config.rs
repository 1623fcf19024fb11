//! CLI configuration and layering of flags over the environment

use crate::commands::TestArgs;
use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use signup_probe::SuiteConfig;
use std::time::Duration;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - minimal output
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Default log filter when `RUST_LOG` is unset
    #[must_use]
    pub const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }
}

/// Layer `args` over `base` (normally [`SuiteConfig::from_env`])
///
/// # Errors
///
/// Returns error for a zero timeout or an empty base URL.
pub fn suite_config(base: SuiteConfig, args: &TestArgs) -> CliResult<SuiteConfig> {
    let mut config = base
        .with_fail_fast(args.fail_fast)
        .with_annotations(!args.no_annotations);

    if let Some(ref url) = args.base_url {
        if url.trim().is_empty() {
            return Err(CliError::config("--base-url must not be empty"));
        }
        config = config.with_base_url(url.trim());
    }
    if args.headless {
        config = config.with_headless(true);
    }
    if let Some(secs) = args.timeout {
        if secs == 0 {
            return Err(CliError::config("--timeout must be at least 1 second"));
        }
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if let Some(reruns) = args.reruns {
        config = config.with_reruns(reruns);
    }
    if let Some(ref dir) = args.output {
        config = config.with_report_dir(dir);
    }
    if let Some(ref dir) = args.screenshots {
        config = config.with_screenshot_dir(dir);
    }
    Ok(config)
}
