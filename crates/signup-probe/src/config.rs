//! Suite configuration.
//!
//! Defaults can be overridden from the environment (`BASE_URL`, `BROWSER`,
//! `HEADLESS`, `CI`, `DEFAULT_TIMEOUT`, `CHROMIUM_PATH`) and then from
//! command-line flags layered on top by the CLI.

use crate::driver::{DeviceDescriptor, DriverConfig};
use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Site under test when `BASE_URL` is unset
pub const DEFAULT_BASE_URL: &str = "https://app.swiftassess.com";

/// Element wait in seconds when `DEFAULT_TIMEOUT` is unset
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Directory for failure screenshots
pub const DEFAULT_SCREENSHOT_DIR: &str = "test_screenshots";

/// Directory for HTML/JSON reports
pub const DEFAULT_REPORT_DIR: &str = "test-results";

/// Browser family to launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    /// Google Chrome
    #[default]
    Chrome,
    /// Chromium
    Chromium,
    /// Microsoft Edge
    Edge,
}

impl BrowserKind {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Chromium => "chromium",
            Self::Edge => "edge",
        }
    }
}

impl std::fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "google-chrome" => Ok(Self::Chrome),
            "chromium" => Ok(Self::Chromium),
            "edge" | "msedge" => Ok(Self::Edge),
            other => Err(ProbeError::Config {
                message: format!("unsupported browser {other:?}; only Chromium-based browsers speak CDP"),
            }),
        }
    }
}

/// Configuration shared by every case in a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Site root, without the `/Signup` path
    pub base_url: String,
    /// Browser family
    pub browser: BrowserKind,
    /// Run without a visible window
    pub headless: bool,
    /// Bounded wait for every element interaction
    pub timeout: Duration,
    /// Browser executable override
    pub chromium_path: Option<String>,
    /// Failure screenshots
    pub screenshot_dir: PathBuf,
    /// Reports
    pub report_dir: PathBuf,
    /// Overrides each case's own re-run count
    pub reruns: Option<u32>,
    /// Stop at the first failing case
    pub fail_fast: bool,
    /// Collect per-case annotations for the report
    pub annotate: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            browser: BrowserKind::Chrome,
            headless: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            chromium_path: None,
            screenshot_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            reruns: None,
            fail_fast: false,
            annotate: true,
        }
    }
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl SuiteConfig {
    /// Defaults, ignoring the environment
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Config`] for unparsable values.
    pub fn from_env() -> ProbeResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Config`] for unparsable values.
    pub fn from_lookup<F>(lookup: F) -> ProbeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("BASE_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(browser) = lookup("BROWSER").filter(|v| !v.trim().is_empty()) {
            config.browser = browser.parse()?;
        }

        let headless = lookup("HEADLESS").is_some_and(|v| truthy(&v));
        let ci = lookup("CI").is_some_and(|v| !v.is_empty() && v != "0" && v != "false");
        config.headless = headless || ci;

        if let Some(raw) = lookup("DEFAULT_TIMEOUT").filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| ProbeError::Config {
                message: format!("DEFAULT_TIMEOUT must be whole seconds, got {raw:?}"),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.chromium_path = lookup("CHROMIUM_PATH").filter(|v| !v.is_empty());
        Ok(config)
    }

    /// Set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set element timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set screenshot directory
    #[must_use]
    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Set report directory
    #[must_use]
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }

    /// Override every case's re-run count
    #[must_use]
    pub const fn with_reruns(mut self, reruns: u32) -> Self {
        self.reruns = Some(reruns);
        self
    }

    /// Stop after the first failure
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Turn report annotations on or off
    #[must_use]
    pub const fn with_annotations(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    /// Full URL of the signup page
    #[must_use]
    pub fn signup_url(&self) -> String {
        format!("{}{}", self.base_url, crate::signup::SIGNUP_PATH)
    }

    /// Browser launch settings for a session emulating `device`
    #[must_use]
    pub fn driver_config(&self, device: DeviceDescriptor) -> DriverConfig {
        let mut config = DriverConfig::new()
            .headless(self.headless)
            .device(device)
            .navigation_timeout(self.timeout.max(Duration::from_secs(30)));
        if let Some(path) = &self.chromium_path {
            config = config.executable_path(path.clone());
        }
        config
    }
}
