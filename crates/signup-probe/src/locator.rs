//! Locator abstraction for element selection.
//!
//! A [`Selector`] is the (strategy, value) pair that identifies one DOM element.
//! A [`Locator`] pairs a selector with the bounded-wait options used when the
//! page object interacts with it.
//!
//! Selectors render to JavaScript query expressions so that any driver able to
//! evaluate script can resolve them, which is how the CDP driver inspects
//! element state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default timeout for auto-waiting (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval for auto-waiting (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "value", rename_all = "snake_case")]
pub enum Selector {
    /// Element id attribute (e.g., "SignUp1_txtName")
    Id(String),
    /// CSS selector (e.g., "div.fadeInBig")
    Css(String),
    /// XPath selector
    XPath(String),
}

impl Selector {
    /// Create an id selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Strategy name as used in logs and reports
    #[must_use]
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Css(_) => "css",
            Self::XPath(_) => "xpath",
        }
    }

    /// Raw selector value
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Id(v) | Self::Css(v) | Self::XPath(v) => v,
        }
    }

    /// CSS form of the selector, if one exists.
    ///
    /// Id selectors become `#id`; XPath has no CSS equivalent.
    #[must_use]
    pub fn as_css(&self) -> Option<String> {
        match self {
            Self::Id(id) => Some(format!("#{id}")),
            Self::Css(css) => Some(css.clone()),
            Self::XPath(_) => None,
        }
    }

    /// Convert to a JavaScript expression yielding the first match (or null)
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Id(id) => format!("document.getElementById({id:?})"),
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::XPath(s) => {
                format!("document.evaluate({s:?}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue")
            }
        }
    }

    /// Convert to a JavaScript expression counting matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::Id(id) => format!("document.querySelectorAll('[id=\"' + {id:?} + '\"]').length"),
            Self::Css(s) => format!("document.querySelectorAll({s:?}).length"),
            Self::XPath(s) => {
                format!("document.evaluate({s:?}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength")
            }
        }
    }

    /// JavaScript expression producing a JSON snapshot of the element state.
    ///
    /// Evaluates to the string `"null"` when the element is absent. The shape
    /// matches [`crate::driver::ElementState`].
    #[must_use]
    pub fn to_state_script(&self) -> String {
        format!(
            r"(() => {{
    const count = {count};
    const el = {query};
    if (!el) {{ return JSON.stringify({{ count: count, state: null }}); }}
    const style = window.getComputedStyle(el);
    const rect = el.getBoundingClientRect();
    const options = el.tagName === 'SELECT' ? Array.from(el.options).map(o => o.text.trim()) : [];
    const selected = el.tagName === 'SELECT' && el.selectedIndex >= 0 ? el.options[el.selectedIndex].text.trim() : null;
    return JSON.stringify({{ count: count, state: {{
        tag_name: el.tagName.toLowerCase(),
        text: (el.innerText || el.textContent || '').trim(),
        value: 'value' in el ? String(el.value) : null,
        displayed: rect.width > 0 && rect.height > 0 && style.visibility !== 'hidden',
        display: style.display,
        enabled: !el.disabled,
        options: options,
        selected_option: selected
    }} }});
}})()",
            count = self.to_count_query(),
            query = self.to_query(),
        )
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Css(css) => write!(f, "{css}"),
            Self::XPath(xpath) => write!(f, "xpath={xpath}"),
        }
    }
}

/// Locator options for customizing wait behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorOptions {
    /// Timeout for auto-waiting
    pub timeout: Duration,
    /// Polling interval for auto-waiting
    pub poll_interval: Duration,
    /// Whether to require strict single-element match
    pub strict: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            strict: true,
        }
    }
}

/// A selector plus the options used to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    options: LocatorOptions,
}

impl Locator {
    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            options: LocatorOptions::default(),
        }
    }

    /// Set a custom timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set a custom polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.options.poll_interval = interval;
        self
    }

    /// Disable strict mode (allow multiple matches)
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }
}

impl From<Selector> for Locator {
    fn from(selector: Selector) -> Self {
        Self::from_selector(selector)
    }
}
