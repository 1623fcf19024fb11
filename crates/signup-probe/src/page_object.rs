//! Page Object Model support.
//!
//! A page object owns the locators for one page and exposes intent-level
//! actions over them. The [`PageObject`] trait carries the page's identity
//! (where it lives, what proves it is loaded); [`UrlMatcher`] decides whether
//! a URL belongs to it.

use crate::locator::Selector;

/// Trait for page objects representing a page in the UI.
pub trait PageObject {
    /// URL path pattern that matches this page (e.g., "/Signup", "/users/*")
    fn url_pattern(&self) -> &str;

    /// Element whose presence means the page has rendered
    fn ready_selector(&self) -> Selector;

    /// Optional wait time for page load (in milliseconds)
    fn load_timeout_ms(&self) -> u64 {
        30_000
    }

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Absolute URL of the page under `base_url`
    fn url(&self, base_url: &str) -> String {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.url_pattern().trim_start_matches('/')
        )
    }

    /// Whether `url` points at this page
    fn matches_url(&self, url: &str) -> bool {
        UrlMatcher::new(self.url_pattern()).matches_url(url)
    }
}

/// URL path matcher for page objects.
///
/// Literal segments compare case-insensitively (IIS routes `/signup` and
/// `/Signup` to the same page).
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone)]
enum UrlSegment {
    Literal(String),
    Wildcard,
}

impl UrlMatcher {
    /// Create a new URL matcher from a pattern
    ///
    /// Patterns support:
    /// - Literal segments: `/Signup`
    /// - Wildcards: `/users/*`
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s == "*" {
                    UrlSegment::Wildcard
                } else {
                    UrlSegment::Literal(s.to_string())
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// Check if a path matches the pattern
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        // wildcards consume exactly one segment
        if path_segments.len() != self.segments.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(path_segments)
            .all(|(segment, actual)| match segment {
                UrlSegment::Literal(lit) => lit.eq_ignore_ascii_case(actual),
                UrlSegment::Wildcard => true,
            })
    }

    /// Check a full URL, ignoring scheme, host, query and fragment
    #[must_use]
    pub fn matches_url(&self, url: &str) -> bool {
        let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
        let path = if url.contains("://") {
            without_scheme
                .find('/')
                .map_or("/", |i| &without_scheme[i..])
        } else {
            without_scheme
        };
        let path = path.split(['?', '#']).next().unwrap_or("/");
        self.matches(path)
    }

    /// Get the original pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
