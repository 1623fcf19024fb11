//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// At least one case failed
    #[error("{failed} of {total} cases failed")]
    TestsFailed {
        /// Failed cases
        failed: usize,
        /// Recorded cases
        total: usize,
    },

    /// No case matched the selection
    #[error("No cases selected")]
    NothingSelected,

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Library error
    #[error("Probe error: {0}")]
    Probe(#[from] signup_probe::ProbeError),

    /// Report generation error
    #[error("Report generation failed: {message}")]
    ReportGeneration {
        /// Error message
        message: String,
    },
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a report generation error
    #[must_use]
    pub fn report_generation(message: impl Into<String>) -> Self {
        Self::ReportGeneration {
            message: message.into(),
        }
    }

    /// Whether the error only reports failed cases
    #[must_use]
    pub const fn is_test_failure(&self) -> bool {
        matches!(self, Self::TestsFailed { .. })
    }
}
