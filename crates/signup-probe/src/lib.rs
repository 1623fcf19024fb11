//! signup-probe: page-object driven end-to-end checks for the SwiftAssess
//! signup form.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ SignupCase   │──►│ SignupPage   │──►│ Driver       │──►│ Chromium     │
//! │ (scenario)   │   │ (page object)│   │ (trait)      │   │ or MockDriver│
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//!        ▲                                                        │
//!        │            ┌──────────────┐   ┌──────────────┐         │
//!        └────────────│ SuiteRunner  │──►│ Reporter     │◄────────┘
//!                     │ (sessions)   │   │ html/json/xml│  screenshots
//!                     └──────────────┘   └──────────────┘
//! ```
//!
//! Cases run against a real browser with the `browser` feature, or against
//! [`SimulatedSignupSite`] mounted on a [`MockDriver`] with no network at all.

#![warn(missing_docs)]

mod artifacts;
#[cfg(feature = "browser")]
#[allow(clippy::missing_errors_doc)]
mod browser;
mod config;
mod data;
#[allow(clippy::missing_errors_doc)]
mod driver;
pub mod helpers;
mod locator;
mod page_object;
mod reporter;
mod result;
mod runner;
mod scenario;
pub mod signup;
mod validation;
mod wait;

pub use artifacts::ArtifactStore;
#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use config::{
    BrowserKind, SuiteConfig, DEFAULT_BASE_URL, DEFAULT_REPORT_DIR, DEFAULT_SCREENSHOT_DIR,
    DEFAULT_TIMEOUT_SECS,
};
pub use data::{
    TestDataGenerator, ACCOUNT_TYPES, COUNTRIES, DEFAULT_ACCOUNT_NAME_LEN, INVALID_ACCOUNT_NAMES,
    INVALID_EMAILS, PLACEHOLDER_CAPTCHA,
};
pub use driver::{
    DeviceDescriptor, Driver, DriverConfig, ElementState, MockDom, MockDriver, MockElement,
    MockPage, Screenshot,
};
pub use locator::{Locator, LocatorOptions, Selector, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
pub use page_object::{PageObject, UrlMatcher};
pub use reporter::{
    annotator, Annotations, Attachment, AttachmentBody, FailureMode, NoopAnnotator,
    RecordingAnnotator, Reporter, TestAnnotator, TestResultEntry, TestStatus, REPORT_TITLE,
};
pub use result::{ensure, ProbeError, ProbeResult};
#[cfg(feature = "browser")]
pub use runner::ChromiumFactory;
pub use runner::{
    CaseFilter, DriverFactory, NoopObserver, RunObserver, SimulatedFactory, SuiteRunner,
    SIMULATED_SETTLE,
};
pub use scenario::{
    catalog, Marker, Scenario, SessionProfile, Severity, SignupCase, MOBILE_MAX_WIDTH,
};
pub use signup::{
    ErrorMessage, Field, SignupForm, SignupPage, SimulatedSignupSite, ACCOUNT_TYPE_PLACEHOLDER,
};
pub use validation::{
    is_valid_account_name, is_valid_email, validate_account_name, AccountNameViolation,
    MIN_ACCOUNT_NAME_LEN,
};
pub use wait::{
    ElementCondition, LoadState, WaitOptions, WaitResult, Waiter, AJAX_IDLE_SCRIPT,
    READY_STATE_SCRIPT,
};

/// Prelude for convenient imports
pub mod prelude {
    #[cfg(feature = "browser")]
    pub use super::browser::*;
    pub use super::config::*;
    pub use super::data::*;
    pub use super::driver::*;
    pub use super::locator::*;
    pub use super::page_object::*;
    pub use super::reporter::*;
    pub use super::result::*;
    pub use super::runner::*;
    pub use super::scenario::*;
    pub use super::signup::*;
    pub use super::validation::*;
    pub use super::wait::*;
}
