//! Result and error types for signup-probe.

use thiserror::Error;

/// Result type for signup-probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving the signup page
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A bounded wait ran out
    #[error("Timed out after {ms}ms waiting for {what}")]
    Timeout {
        /// What was being waited for
        what: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Element is not in the DOM
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Selector that matched nothing
        selector: String,
    },

    /// Selector resolved to more than one element
    #[error("Selector {selector} matched {count} elements, expected at most one")]
    AmbiguousSelector {
        /// Offending selector
        selector: String,
        /// Number of matches
        count: usize,
    },

    /// Dropdown has no option with the requested visible text
    #[error("No option with visible text {option:?} in {selector}")]
    OptionNotFound {
        /// Dropdown selector
        selector: String,
        /// Requested option text
        option: String,
    },

    /// Script evaluation error
    #[error("Script evaluation failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Input simulation error
    #[error("Input simulation failed: {message}")]
    Input {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Session setup/teardown failed
    #[error("Session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProbeError {
    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a script failure
    #[must_use]
    pub fn script(message: impl Into<String>) -> Self {
        Self::Script {
            message: message.into(),
        }
    }

    /// Whether this error came from a bounded wait
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Fail with an assertion error unless `condition` holds.
///
/// # Errors
///
/// Returns [`ProbeError::AssertionFailed`] carrying `message` when `condition` is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> ProbeResult<()> {
    if condition {
        Ok(())
    } else {
        Err(ProbeError::assertion(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = ProbeError::Timeout {
            what: "#SignUp1_txtName".to_string(),
            ms: 10_000,
        };
        assert_eq!(
            err.to_string(),
            "Timed out after 10000ms waiting for #SignUp1_txtName"
        );
        assert!(err.is_timeout());
    }

    #[test]
    fn test_ensure() {
        assert!(ensure(true, "never shown").is_ok());
        let err = ensure(false, "name error missing").unwrap_err();
        assert!(err.to_string().contains("name error missing"));
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ProbeError = io_err.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
