//! Driver - Abstract Browser Automation Trait
//!
//! The page object never talks to a browser directly. It goes through the
//! [`Driver`] trait, which exposes the handful of capabilities the suite
//! needs: navigate, find-element, type/select/click, execute-script and
//! screenshot. Bounded waiting is layered on top in [`crate::wait`].
//!
//! # Implementations
//!
//! - `ChromiumDriver` - real browser over CDP (`browser` feature)
//! - [`MockDriver`] - in-memory DOM for unit tests and offline suite runs

use crate::page_object::UrlMatcher;
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Snapshot of a DOM element's interactable state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementState {
    /// Lowercase tag name
    pub tag_name: String,
    /// Rendered text content
    pub text: String,
    /// Form control value, if the element has one
    pub value: Option<String>,
    /// Whether the element occupies layout space and is not `visibility: hidden`
    pub displayed: bool,
    /// Computed CSS `display`
    pub display: String,
    /// Whether the control accepts input
    pub enabled: bool,
    /// Visible option texts (select elements only)
    #[serde(default)]
    pub options: Vec<String>,
    /// Currently selected option text (select elements only)
    #[serde(default)]
    pub selected_option: Option<String>,
}

impl ElementState {
    /// Displayed and not `display: none`
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.displayed && self.display != "none"
    }

    /// Visible and enabled
    #[must_use]
    pub fn is_clickable(&self) -> bool {
        self.is_visible() && self.enabled
    }
}

/// Screenshot data with metadata
#[derive(Debug, Clone)]
pub struct Screenshot {
    /// Raw PNG data
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Timestamp when screenshot was taken
    pub timestamp: std::time::SystemTime,
}

impl Screenshot {
    /// Create a new screenshot
    #[must_use]
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp: std::time::SystemTime::now(),
        }
    }

    /// Get the size in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check if screenshot is valid (has data)
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.data.is_empty() && self.width > 0 && self.height > 0
    }
}

/// Browser configuration for a driver session
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Device profile applied to the first page
    pub device: DeviceDescriptor,
    /// Disable the Chromium sandbox (CI containers)
    pub sandbox: bool,
    /// Timeout for navigation
    pub navigation_timeout: Duration,
    /// Executable path override
    pub executable_path: Option<String>,
    /// Extra command-line switches
    pub extra_args: Vec<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            device: DeviceDescriptor::DESKTOP_1080P,
            sandbox: true,
            navigation_timeout: Duration::from_secs(30),
            executable_path: None,
            extra_args: vec![
                "--start-maximized".to_string(),
                "--disable-blink-features=AutomationControlled".to_string(),
            ],
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode.
    ///
    /// Headless sessions also drop the sandbox and `/dev/shm` usage, matching
    /// what CI containers need.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        if headless {
            self.sandbox = false;
            self.extra_args.push("--disable-dev-shm-usage".to_string());
        }
        self
    }

    /// Set device profile
    #[must_use]
    pub const fn device(mut self, device: DeviceDescriptor) -> Self {
        self.device = device;
        self
    }

    /// Set navigation timeout
    #[must_use]
    pub const fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Set browser executable
    #[must_use]
    pub fn executable_path(mut self, path: impl Into<String>) -> Self {
        self.executable_path = Some(path.into());
        self
    }
}

/// Device descriptor for viewport emulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceDescriptor {
    /// Device name
    pub name: &'static str,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Device scale factor
    pub device_scale_factor: f64,
    /// Is mobile device
    pub is_mobile: bool,
    /// Has touch support
    pub has_touch: bool,
    /// User agent override (empty = browser default)
    pub user_agent: &'static str,
}

impl DeviceDescriptor {
    /// iPhone X, the profile the mobile cases emulate
    pub const IPHONE_X: Self = Self {
        name: "iphone_x",
        viewport_width: 375,
        viewport_height: 812,
        device_scale_factor: 3.0,
        is_mobile: true,
        has_touch: true,
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) AppleWebKit/605.1.15",
    };

    /// iPhone 12
    pub const IPHONE_12: Self = Self {
        name: "iphone_12",
        viewport_width: 390,
        viewport_height: 844,
        device_scale_factor: 3.0,
        is_mobile: true,
        has_touch: true,
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) AppleWebKit/605.1.15",
    };

    /// Samsung Galaxy S21
    pub const SAMSUNG_S21: Self = Self {
        name: "samsung_s21",
        viewport_width: 360,
        viewport_height: 800,
        device_scale_factor: 3.0,
        is_mobile: true,
        has_touch: true,
        user_agent: "Mozilla/5.0 (Linux; Android 11; SM-G991B) AppleWebKit/537.36 Chrome/90.0 Mobile",
    };

    /// iPad
    pub const IPAD: Self = Self {
        name: "ipad",
        viewport_width: 768,
        viewport_height: 1024,
        device_scale_factor: 2.0,
        is_mobile: true,
        has_touch: true,
        user_agent: "Mozilla/5.0 (iPad; CPU OS 14_0 like Mac OS X) AppleWebKit/605.1.15",
    };

    /// Desktop 1080p
    pub const DESKTOP_1080P: Self = Self {
        name: "desktop_1080p",
        viewport_width: 1920,
        viewport_height: 1080,
        device_scale_factor: 1.0,
        is_mobile: false,
        has_touch: false,
        user_agent: "",
    };

    /// Mobile devices selectable by name
    pub const MOBILE: [Self; 4] = [Self::IPHONE_X, Self::IPHONE_12, Self::SAMSUNG_S21, Self::IPAD];

    /// Look up a mobile device by name, falling back to the iPhone X
    #[must_use]
    pub fn by_name(name: &str) -> Self {
        Self::MOBILE
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .copied()
            .unwrap_or(Self::IPHONE_X)
    }
}

/// Abstract driver trait for browser automation
///
/// Every call is a single round trip; callers that need to wait for a
/// condition poll through [`crate::wait::Waiter`].
#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigate to URL
    async fn navigate(&mut self, url: &str) -> ProbeResult<()>;

    /// Get current URL
    async fn current_url(&self) -> ProbeResult<String>;

    /// Resolve a selector to the element's state, `None` if absent
    async fn find_element(&self, selector: &crate::Selector) -> ProbeResult<Option<ElementState>>;

    /// Clear a text control
    async fn clear(&mut self, selector: &crate::Selector) -> ProbeResult<()>;

    /// Type text into a control, appending to its current value
    async fn type_text(&mut self, selector: &crate::Selector, text: &str) -> ProbeResult<()>;

    /// Select the option whose visible text equals `visible_text`
    async fn select_option(
        &mut self,
        selector: &crate::Selector,
        visible_text: &str,
    ) -> ProbeResult<()>;

    /// Click element
    async fn click(&mut self, selector: &crate::Selector) -> ProbeResult<()>;

    /// Evaluate a JavaScript expression in page context
    async fn execute_script(&self, script: &str) -> ProbeResult<serde_json::Value>;

    /// Take screenshot
    async fn screenshot(&self) -> ProbeResult<Screenshot>;

    /// Apply a device profile (viewport, scale, touch, user agent)
    async fn set_device(&mut self, device: &DeviceDescriptor) -> ProbeResult<()>;

    /// Delete cookies and web storage
    async fn clear_browsing_data(&mut self) -> ProbeResult<()>;

    /// Close the browser
    async fn close(&mut self) -> ProbeResult<()>;
}

// ============================================================================
// Mock driver
// ============================================================================

/// 1x1 transparent PNG returned by the mock when no screenshot is staged
const PLACEHOLDER_PNG: [u8; 67] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Element in the mock DOM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    /// Element id
    pub id: String,
    /// Lowercase tag name
    pub tag_name: String,
    /// Class list
    pub classes: Vec<String>,
    /// Text content
    pub text: String,
    /// Control value
    pub value: Option<String>,
    /// Whether the element takes up layout space
    pub displayed: bool,
    /// Computed `display`
    pub display: String,
    /// Whether the control is enabled
    pub enabled: bool,
    /// Option texts for select elements
    pub options: Vec<String>,
}

impl MockElement {
    fn base(id: &str, tag: &str) -> Self {
        Self {
            id: id.to_string(),
            tag_name: tag.to_string(),
            classes: Vec::new(),
            text: String::new(),
            value: None,
            displayed: true,
            display: "inline-block".to_string(),
            enabled: true,
            options: Vec::new(),
        }
    }

    /// Text input
    #[must_use]
    pub fn input(id: &str) -> Self {
        Self {
            value: Some(String::new()),
            ..Self::base(id, "input")
        }
    }

    /// Dropdown with options; the first option starts selected
    #[must_use]
    pub fn select<S: AsRef<str>>(id: &str, options: &[S]) -> Self {
        let options: Vec<String> = options.iter().map(|o| o.as_ref().to_string()).collect();
        Self {
            value: options.first().cloned(),
            options,
            ..Self::base(id, "select")
        }
    }

    /// Submit button
    #[must_use]
    pub fn button(id: &str, label: &str) -> Self {
        Self {
            text: label.to_string(),
            value: Some(label.to_string()),
            ..Self::base(id, "input")
        }
    }

    /// Validator span rendered but hidden, as ASP.NET emits them
    #[must_use]
    pub fn validator(id: &str, message: &str) -> Self {
        Self {
            text: message.to_string(),
            displayed: false,
            display: "none".to_string(),
            ..Self::base(id, "span")
        }
    }

    /// Generic block element
    #[must_use]
    pub fn div(id: &str) -> Self {
        Self {
            display: "block".to_string(),
            ..Self::base(id, "div")
        }
    }

    /// Image
    #[must_use]
    pub fn img(id: &str) -> Self {
        Self::base(id, "img")
    }

    /// Add a class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Set text content
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Start hidden (`display: none`)
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self.display = "none".to_string();
        self
    }

    /// Start disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    fn matches(&self, selector: &crate::Selector) -> bool {
        match selector {
            crate::Selector::Id(id) => self.id == *id,
            crate::Selector::Css(css) => self.matches_css(css),
            crate::Selector::XPath(xpath) => self.matches_xpath(xpath),
        }
    }

    fn matches_css(&self, css: &str) -> bool {
        if let Some(id) = css.strip_prefix('#') {
            return self.id == id;
        }
        let (tag, class) = match css.split_once('.') {
            Some((tag, class)) => (tag, Some(class)),
            None => (css, None),
        };
        let tag_ok = tag.is_empty() || tag == self.tag_name;
        let class_ok = class.map_or(true, |c| self.classes.iter().any(|k| k == c));
        tag_ok && class_ok
    }

    fn matches_xpath(&self, xpath: &str) -> bool {
        static CONTAINS_CLASS: OnceLock<Option<Regex>> = OnceLock::new();
        static ID_EQUALS: OnceLock<Option<Regex>> = OnceLock::new();

        let contains_class = CONTAINS_CLASS.get_or_init(|| {
            Regex::new(r#"^//(\*|[a-z]+)\[contains\(@class,\s*['"]([^'"]+)['"]\)\]$"#).ok()
        });
        let id_equals = ID_EQUALS
            .get_or_init(|| Regex::new(r#"^//(\*|[a-z]+)\[@id\s*=\s*['"]([^'"]+)['"]\]$"#).ok());

        let tag_ok = |tag: &str| tag == "*" || tag == self.tag_name;

        if let Some(caps) = contains_class.as_ref().and_then(|re| re.captures(xpath)) {
            return tag_ok(&caps[1]) && self.classes.iter().any(|c| c.contains(&caps[2]));
        }
        if let Some(caps) = id_equals.as_ref().and_then(|re| re.captures(xpath)) {
            return tag_ok(&caps[1]) && self.id == caps[2];
        }
        false
    }

    fn state(&self) -> ElementState {
        ElementState {
            tag_name: self.tag_name.clone(),
            text: self.text.clone(),
            value: self.value.clone(),
            displayed: self.displayed,
            display: self.display.clone(),
            enabled: self.enabled,
            options: self.options.clone(),
            selected_option: if self.tag_name == "select" {
                self.value.clone()
            } else {
                None
            },
        }
    }
}

/// In-memory DOM backing a [`MockDriver`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockDom {
    elements: Vec<MockElement>,
}

impl MockDom {
    /// Create an empty DOM
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element
    pub fn push(&mut self, element: MockElement) {
        self.elements.push(element);
    }

    /// Builder-style append
    #[must_use]
    pub fn with(mut self, element: MockElement) -> Self {
        self.push(element);
        self
    }

    /// Element by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&MockElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Mutable element by id
    pub fn get_mut(&mut self, id: &str) -> Option<&mut MockElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Remove an element by id
    pub fn remove(&mut self, id: &str) {
        self.elements.retain(|e| e.id != id);
    }

    /// Current value of a control, empty when absent
    #[must_use]
    pub fn value_of(&self, id: &str) -> &str {
        self.get(id)
            .and_then(|e| e.value.as_deref())
            .unwrap_or_default()
    }

    /// Make an element visible
    pub fn show(&mut self, id: &str) {
        if let Some(el) = self.get_mut(id) {
            el.displayed = true;
            el.display = if el.tag_name == "div" { "block" } else { "inline" }.to_string();
        }
    }

    /// Hide an element with `display: none`
    pub fn hide(&mut self, id: &str) {
        if let Some(el) = self.get_mut(id) {
            el.displayed = false;
            el.display = "none".to_string();
        }
    }

    /// All elements matching a selector
    #[must_use]
    pub fn query(&self, selector: &crate::Selector) -> Vec<&MockElement> {
        self.elements.iter().filter(|e| e.matches(selector)).collect()
    }

    /// Number of elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the DOM is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// A page the mock driver can serve.
///
/// `render` produces a fresh DOM on every navigation; `on_click` lets the
/// page react to clicks (form submission, validators).
pub trait MockPage: Send + Sync {
    /// Build the DOM for a fresh page load
    fn render(&self) -> MockDom;

    /// React to a click on `element_id`
    fn on_click(&self, element_id: &str, dom: &mut MockDom) {
        let _ = (element_id, dom);
    }
}

/// Mock driver for unit testing and offline runs
#[derive(Default)]
pub struct MockDriver {
    /// Current URL
    pub current_url: String,
    /// Current DOM
    pub dom: MockDom,
    /// Active device profile
    pub device: Option<DeviceDescriptor>,
    /// Staged script results keyed by exact script text
    pub script_results: HashMap<String, serde_json::Value>,
    /// Screenshot data
    pub screenshot_data: Option<Screenshot>,
    /// Call history for verification
    pub call_history: Vec<String>,
    /// Refuse navigation as if the network were down
    pub offline: bool,
    pages: Vec<(UrlMatcher, Arc<dyn MockPage>)>,
    active: Option<Arc<dyn MockPage>>,
}

impl std::fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDriver")
            .field("current_url", &self.current_url)
            .field("elements", &self.dom.len())
            .field("pages", &self.pages.len())
            .field("offline", &self.offline)
            .finish_non_exhaustive()
    }
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock driver with a preloaded DOM
    #[must_use]
    pub fn with_dom(dom: MockDom) -> Self {
        Self {
            dom,
            ..Self::default()
        }
    }

    /// Serve `page` for URLs whose path matches `pattern`
    pub fn mount(&mut self, pattern: &str, page: Arc<dyn MockPage>) {
        self.pages.push((UrlMatcher::new(pattern), page));
    }

    /// Stage a result for an exact script
    pub fn set_script_result(&mut self, script: impl Into<String>, result: serde_json::Value) {
        let _ = self.script_results.insert(script.into(), result);
    }

    /// Set mock screenshot
    pub fn set_screenshot(&mut self, screenshot: Screenshot) {
        self.screenshot_data = Some(screenshot);
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.call_history
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_history.iter().any(|c| c.starts_with(method))
    }

    fn viewport(&self) -> DeviceDescriptor {
        self.device.unwrap_or(DeviceDescriptor::DESKTOP_1080P)
    }

    fn resolve(&self, selector: &crate::Selector) -> ProbeResult<Option<&MockElement>> {
        let matches = self.dom.query(selector);
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.first().copied()),
            count => Err(ProbeError::AmbiguousSelector {
                selector: selector.to_string(),
                count,
            }),
        }
    }

    fn resolve_id(&self, selector: &crate::Selector) -> ProbeResult<String> {
        self.resolve(selector)?
            .map(|e| e.id.clone())
            .ok_or_else(|| ProbeError::ElementNotFound {
                selector: selector.to_string(),
            })
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        self.call_history.push(format!("navigate:{url}"));
        if self.offline {
            return Err(ProbeError::Navigation {
                url: url.to_string(),
                message: "net::ERR_INTERNET_DISCONNECTED".to_string(),
            });
        }
        self.active = self
            .pages
            .iter()
            .find(|(matcher, _)| matcher.matches_url(url))
            .map(|(_, page)| Arc::clone(page));
        if let Some(page) = &self.active {
            self.dom = page.render();
        } else if !self.pages.is_empty() {
            self.dom = MockDom::new();
        }
        self.current_url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> ProbeResult<String> {
        Ok(self.current_url.clone())
    }

    async fn find_element(&self, selector: &crate::Selector) -> ProbeResult<Option<ElementState>> {
        Ok(self.resolve(selector)?.map(MockElement::state))
    }

    async fn clear(&mut self, selector: &crate::Selector) -> ProbeResult<()> {
        self.call_history.push(format!("clear:{selector}"));
        let id = self.resolve_id(selector)?;
        if let Some(el) = self.dom.get_mut(&id) {
            el.value = Some(String::new());
        }
        Ok(())
    }

    async fn type_text(&mut self, selector: &crate::Selector, text: &str) -> ProbeResult<()> {
        self.call_history.push(format!("type:{selector}"));
        let id = self.resolve_id(selector)?;
        if let Some(el) = self.dom.get_mut(&id) {
            if !el.enabled {
                return Err(ProbeError::Input {
                    message: format!("{selector} is disabled"),
                });
            }
            el.value.get_or_insert_with(String::new).push_str(text);
        }
        Ok(())
    }

    async fn select_option(
        &mut self,
        selector: &crate::Selector,
        visible_text: &str,
    ) -> ProbeResult<()> {
        self.call_history.push(format!("select:{selector}={visible_text}"));
        let id = self.resolve_id(selector)?;
        let Some(el) = self.dom.get_mut(&id) else {
            return Ok(());
        };
        if el.tag_name != "select" {
            return Err(ProbeError::Input {
                message: format!("{selector} is a <{}>, not a <select>", el.tag_name),
            });
        }
        if !el.options.iter().any(|o| o == visible_text) {
            return Err(ProbeError::OptionNotFound {
                selector: selector.to_string(),
                option: visible_text.to_string(),
            });
        }
        el.value = Some(visible_text.to_string());
        Ok(())
    }

    async fn click(&mut self, selector: &crate::Selector) -> ProbeResult<()> {
        self.call_history.push(format!("click:{selector}"));
        let id = self.resolve_id(selector)?;
        let clickable = self
            .dom
            .get(&id)
            .is_some_and(|el| el.state().is_clickable());
        if !clickable {
            return Err(ProbeError::Input {
                message: format!("{selector} is not clickable"),
            });
        }
        if let Some(page) = self.active.clone() {
            page.on_click(&id, &mut self.dom);
        }
        Ok(())
    }

    async fn execute_script(&self, script: &str) -> ProbeResult<serde_json::Value> {
        if let Some(result) = self.script_results.get(script) {
            return Ok(result.clone());
        }
        let viewport = self.viewport();
        match script.trim() {
            "window.innerWidth" => Ok(serde_json::json!(viewport.viewport_width)),
            "window.innerHeight" => Ok(serde_json::json!(viewport.viewport_height)),
            "document.readyState" => Ok(serde_json::json!("complete")),
            "document.title" => Ok(serde_json::json!("SwiftAssess")),
            other => Err(ProbeError::script(format!(
                "ReferenceError while evaluating {other:?}"
            ))),
        }
    }

    async fn screenshot(&self) -> ProbeResult<Screenshot> {
        Ok(self
            .screenshot_data
            .clone()
            .unwrap_or_else(|| Screenshot::new(PLACEHOLDER_PNG.to_vec(), 1, 1)))
    }

    async fn set_device(&mut self, device: &DeviceDescriptor) -> ProbeResult<()> {
        self.call_history.push(format!("set_device:{}", device.name));
        self.device = Some(*device);
        Ok(())
    }

    async fn clear_browsing_data(&mut self) -> ProbeResult<()> {
        self.call_history.push("clear_browsing_data".to_string());
        Ok(())
    }

    async fn close(&mut self) -> ProbeResult<()> {
        self.call_history.push("close".to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Selector;

    fn form_dom() -> MockDom {
        MockDom::new()
            .with(MockElement::input("name"))
            .with(MockElement::select("country", &["Canada", "France"]))
            .with(MockElement::button("go", "Sign Up"))
            .with(MockElement::validator("err", "Name is required"))
            .with(MockElement::div("ok").with_class("animated").with_class("fadeInBig").hidden())
    }

    mod element_state_tests {
        use super::*;

        #[test]
        fn test_visibility_requires_display() {
            let mut state = ElementState {
                displayed: true,
                display: "none".to_string(),
                enabled: true,
                ..ElementState::default()
            };
            assert!(!state.is_visible());
            state.display = "inline".to_string();
            assert!(state.is_visible());
            assert!(state.is_clickable());
            state.enabled = false;
            assert!(!state.is_clickable());
        }

        #[test]
        fn test_deserialize_from_script_shape() {
            let json = r#"{"tag_name":"span","text":"Name is required","value":null,
                "displayed":true,"display":"inline","enabled":true}"#;
            let state: ElementState = serde_json::from_str(json).unwrap();
            assert!(state.is_visible());
            assert!(state.options.is_empty());
        }
    }

    mod screenshot_tests {
        use super::*;

        #[test]
        fn test_screenshot_is_valid() {
            assert!(Screenshot::new(vec![1, 2, 3], 100, 100).is_valid());
            assert!(!Screenshot::new(vec![], 100, 100).is_valid());
            assert!(!Screenshot::new(vec![1], 0, 100).is_valid());
            assert_eq!(Screenshot::new(vec![0; 8], 1, 1).size_bytes(), 8);
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_headless_disables_sandbox() {
            let config = DriverConfig::new().headless(true);
            assert!(config.headless);
            assert!(!config.sandbox);
            assert!(config.extra_args.iter().any(|a| a == "--disable-dev-shm-usage"));
        }

        #[test]
        fn test_headed_keeps_sandbox() {
            let config = DriverConfig::new().headless(false);
            assert!(config.sandbox);
            assert!(config
                .extra_args
                .iter()
                .any(|a| a == "--disable-blink-features=AutomationControlled"));
        }

        #[test]
        fn test_device_lookup() {
            assert_eq!(DeviceDescriptor::by_name("ipad").viewport_width, 768);
            assert_eq!(DeviceDescriptor::by_name("SAMSUNG_S21").viewport_width, 360);
            assert_eq!(DeviceDescriptor::by_name("nokia_3310"), DeviceDescriptor::IPHONE_X);
        }

        #[test]
        fn test_mobile_profiles_fit_mobile_width() {
            for device in DeviceDescriptor::MOBILE {
                assert!(device.is_mobile);
                assert!(device.viewport_width <= 768, "{}", device.name);
            }
        }
    }

    mod mock_dom_tests {
        use super::*;

        #[test]
        fn test_query_strategies() {
            let dom = form_dom();
            assert_eq!(dom.query(&Selector::id("name")).len(), 1);
            assert_eq!(dom.query(&Selector::css("#country")).len(), 1);
            assert_eq!(dom.query(&Selector::css("div.fadeInBig")).len(), 1);
            assert_eq!(dom.query(&Selector::css("span")).len(), 1);
            assert_eq!(
                dom.query(&Selector::xpath("//div[contains(@class, 'fadeInBig')]")).len(),
                1
            );
            assert_eq!(dom.query(&Selector::xpath("//*[@id='go']")).len(), 1);
            assert!(dom.query(&Selector::xpath("//table")).is_empty());
        }

        #[test]
        fn test_show_hide() {
            let mut dom = form_dom();
            dom.show("err");
            assert!(dom.get("err").unwrap().state().is_visible());
            dom.hide("err");
            assert!(!dom.get("err").unwrap().state().is_visible());
        }
    }

    mod mock_driver_tests {
        use super::*;

        #[tokio::test]
        async fn test_type_and_clear() {
            let mut driver = MockDriver::with_dom(form_dom());
            let name = Selector::id("name");
            driver.type_text(&name, "John").await.unwrap();
            driver.type_text(&name, " Doe").await.unwrap();
            assert_eq!(driver.dom.value_of("name"), "John Doe");
            driver.clear(&name).await.unwrap();
            assert_eq!(driver.dom.value_of("name"), "");
        }

        #[tokio::test]
        async fn test_select_exact_text() {
            let mut driver = MockDriver::with_dom(form_dom());
            let country = Selector::id("country");
            driver.select_option(&country, "France").await.unwrap();
            let state = driver.find_element(&country).await.unwrap().unwrap();
            assert_eq!(state.selected_option.as_deref(), Some("France"));

            let err = driver.select_option(&country, "france").await.unwrap_err();
            assert!(matches!(err, ProbeError::OptionNotFound { .. }));
        }

        #[tokio::test]
        async fn test_missing_element() {
            let mut driver = MockDriver::with_dom(form_dom());
            let ghost = Selector::id("ghost");
            assert!(driver.find_element(&ghost).await.unwrap().is_none());
            let err = driver.click(&ghost).await.unwrap_err();
            assert!(matches!(err, ProbeError::ElementNotFound { .. }));
        }

        #[tokio::test]
        async fn test_ambiguous_selector() {
            let dom = form_dom().with(MockElement::validator("err2", "x"));
            let driver = MockDriver::with_dom(dom);
            let err = driver.find_element(&Selector::css("span")).await.unwrap_err();
            assert!(matches!(err, ProbeError::AmbiguousSelector { count: 2, .. }));
        }

        #[tokio::test]
        async fn test_hidden_element_not_clickable() {
            let mut driver = MockDriver::with_dom(form_dom());
            let err = driver.click(&Selector::id("err")).await.unwrap_err();
            assert!(matches!(err, ProbeError::Input { .. }));
        }

        #[tokio::test]
        async fn test_builtin_scripts_follow_device() {
            let mut driver = MockDriver::new();
            assert_eq!(
                driver.execute_script("window.innerWidth").await.unwrap(),
                serde_json::json!(1920)
            );
            driver.set_device(&DeviceDescriptor::IPHONE_X).await.unwrap();
            assert_eq!(
                driver.execute_script("window.innerWidth").await.unwrap(),
                serde_json::json!(375)
            );
            assert!(driver.execute_script("jQuery.active == 0").await.is_err());
        }

        #[tokio::test]
        async fn test_staged_script_result_wins() {
            let mut driver = MockDriver::new();
            driver.set_script_result("window.innerWidth", serde_json::json!(320));
            assert_eq!(
                driver.execute_script("window.innerWidth").await.unwrap(),
                serde_json::json!(320)
            );
        }

        #[tokio::test]
        async fn test_offline_navigation_fails() {
            let mut driver = MockDriver {
                offline: true,
                ..MockDriver::default()
            };
            let err = driver.navigate("https://example.com/Signup").await.unwrap_err();
            assert!(matches!(err, ProbeError::Navigation { .. }));
            assert!(driver.was_called("navigate"));
        }

        #[tokio::test]
        async fn test_mounted_page_renders_on_navigate() {
            struct Static;
            impl MockPage for Static {
                fn render(&self) -> MockDom {
                    MockDom::new().with(MockElement::input("only"))
                }
            }

            let mut driver = MockDriver::new();
            driver.mount("/Signup", Arc::new(Static));
            driver.navigate("https://host/Signup").await.unwrap();
            assert_eq!(driver.dom.len(), 1);

            driver.navigate("https://host/Other").await.unwrap();
            assert!(driver.dom.is_empty());
            assert_eq!(driver.current_url().await.unwrap(), "https://host/Other");
        }

        #[tokio::test]
        async fn test_placeholder_screenshot() {
            let driver = MockDriver::new();
            let shot = driver.screenshot().await.unwrap();
            assert!(shot.is_valid());
            assert_eq!(&shot.data[1..4], b"PNG");
        }

        #[tokio::test]
        async fn test_history_tracking() {
            let mut driver = MockDriver::new();
            driver.clear_browsing_data().await.unwrap();
            driver.close().await.unwrap();
            assert!(driver.was_called("clear_browsing_data"));
            assert!(driver.was_called("close"));
            assert_eq!(driver.history().len(), 2);
        }
    }
}
