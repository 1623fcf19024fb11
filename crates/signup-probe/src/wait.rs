//! Wait Mechanisms
//!
//! Bounded polling on top of a [`Driver`]. Every wait checks once before the
//! first sleep, so a zero timeout degrades to a single probe.

use crate::driver::{Driver, ElementState};
use crate::locator::{Locator, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
use crate::result::{ProbeError, ProbeResult};
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Script returning the document ready state
pub const READY_STATE_SCRIPT: &str = "document.readyState";

/// Script checking that no jQuery AJAX request is in flight
pub const AJAX_IDLE_SCRIPT: &str = "jQuery.active == 0";

// =============================================================================
// LOAD STATE
// =============================================================================

/// Values of `document.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
    /// Still parsing
    Loading,
    /// DOM parsed, subresources pending
    Interactive,
    /// Fully loaded
    #[default]
    Complete,
}

impl LoadState {
    /// Parse a `document.readyState` value
    #[must_use]
    pub fn parse(state: &str) -> Option<Self> {
        match state {
            "loading" => Some(Self::Loading),
            "interactive" => Some(Self::Interactive),
            "complete" => Some(Self::Complete),
            _ => None,
        }
    }

    /// The `document.readyState` string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Interactive => "interactive",
            Self::Complete => "complete",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl From<&Locator> for WaitOptions {
    #[allow(clippy::cast_possible_truncation)]
    fn from(locator: &Locator) -> Self {
        let options = locator.options();
        Self {
            timeout_ms: options.timeout.as_millis() as u64,
            poll_interval_ms: options.poll_interval.as_millis() as u64,
        }
    }
}

// =============================================================================
// ELEMENT CONDITIONS
// =============================================================================

/// State an element must reach for a wait to succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementCondition {
    /// Attached to the DOM
    Present,
    /// Displayed and not `display: none`
    Visible,
    /// Visible and enabled
    Clickable,
}

impl ElementCondition {
    /// Whether `state` satisfies the condition
    #[must_use]
    pub fn is_met(&self, state: &ElementState) -> bool {
        match self {
            Self::Present => true,
            Self::Visible => state.is_visible(),
            Self::Clickable => state.is_clickable(),
        }
    }

    const fn describe(self) -> &'static str {
        match self {
            Self::Present => "presence of",
            Self::Visible => "visibility of",
            Self::Clickable => "clickability of",
        }
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Result of a wait operation
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Whether the wait was successful
    pub success: bool,
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
}

impl WaitResult {
    /// Create a successful wait result
    #[must_use]
    pub fn success(elapsed: Duration, waited_for: impl Into<String>) -> Self {
        Self {
            success: true,
            elapsed,
            waited_for: waited_for.into(),
        }
    }

    /// Create a timeout wait result
    #[must_use]
    pub fn timeout(elapsed: Duration, waited_for: impl Into<String>) -> Self {
        Self {
            success: false,
            elapsed,
            waited_for: waited_for.into(),
        }
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Waiter for synchronization operations
#[derive(Debug, Clone, Copy, Default)]
pub struct Waiter {
    options: WaitOptions,
}

impl Waiter {
    /// Create a new waiter with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom options
    #[must_use]
    pub const fn with_options(options: WaitOptions) -> Self {
        Self { options }
    }

    /// Options used by page-level waits
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Wait until the element behind `locator` satisfies `condition`.
    ///
    /// Uses the locator's own timeout and poll interval.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] if the condition is not met in time, or
    /// any driver error raised while probing.
    pub async fn for_element<D: Driver + ?Sized>(
        &self,
        driver: &D,
        locator: &Locator,
        condition: ElementCondition,
    ) -> ProbeResult<ElementState> {
        let options = WaitOptions::from(locator);
        let start = Instant::now();
        loop {
            match driver.find_element(locator.selector()).await {
                Ok(Some(state)) if condition.is_met(&state) => return Ok(state),
                Ok(_) => {}
                Err(ProbeError::AmbiguousSelector { .. }) if !locator.options().strict => {}
                Err(e) => return Err(e),
            }
            if start.elapsed() >= options.timeout() {
                return Err(ProbeError::Timeout {
                    what: format!("{} {}", condition.describe(), locator.selector()),
                    ms: options.timeout_ms,
                });
            }
            sleep(options.poll_interval()).await;
        }
    }

    /// Wait until the element is absent or hidden
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] if the element stays visible.
    pub async fn for_element_to_disappear<D: Driver + ?Sized>(
        &self,
        driver: &D,
        locator: &Locator,
    ) -> ProbeResult<WaitResult> {
        let options = WaitOptions::from(locator);
        let start = Instant::now();
        let what = format!("disappearance of {}", locator.selector());
        loop {
            let gone = driver
                .find_element(locator.selector())
                .await?
                .map_or(true, |state| !state.is_visible());
            if gone {
                return Ok(WaitResult::success(start.elapsed(), what));
            }
            if start.elapsed() >= options.timeout() {
                return Err(ProbeError::Timeout {
                    what,
                    ms: options.timeout_ms,
                });
            }
            sleep(options.poll_interval()).await;
        }
    }

    /// Wait for `document.readyState` to reach `complete`.
    ///
    /// Script failures during navigation count as "not ready yet".
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] if the page never completes loading.
    pub async fn for_page_load<D: Driver + ?Sized>(&self, driver: &D) -> ProbeResult<WaitResult> {
        let start = Instant::now();
        loop {
            let state = driver
                .execute_script(READY_STATE_SCRIPT)
                .await
                .ok()
                .and_then(|v| v.as_str().and_then(LoadState::parse));
            if state == Some(LoadState::Complete) {
                return Ok(WaitResult::success(start.elapsed(), "document ready"));
            }
            if start.elapsed() >= self.options.timeout() {
                return Err(ProbeError::Timeout {
                    what: "document.readyState == complete".to_string(),
                    ms: self.options.timeout_ms,
                });
            }
            sleep(self.options.poll_interval()).await;
        }
    }

    /// Wait for jQuery AJAX activity to settle.
    ///
    /// Pages without jQuery have nothing to wait for, so a failing script ends
    /// the wait successfully. Running out of time is reported in the result
    /// rather than as an error.
    pub async fn for_ajax<D: Driver + ?Sized>(&self, driver: &D) -> WaitResult {
        let start = Instant::now();
        loop {
            match driver.execute_script(AJAX_IDLE_SCRIPT).await {
                Ok(serde_json::Value::Bool(true)) => {
                    return WaitResult::success(start.elapsed(), "ajax idle");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(error = %e, "ajax probe unavailable, not waiting");
                    return WaitResult::success(start.elapsed(), "no jquery");
                }
            }
            if start.elapsed() >= self.options.timeout() {
                return WaitResult::timeout(start.elapsed(), "ajax idle");
            }
            sleep(self.options.poll_interval()).await;
        }
    }
}
