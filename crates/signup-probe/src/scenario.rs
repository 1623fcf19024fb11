//! Declarative signup test cases.
//!
//! Each [`SignupCase`] names a [`Scenario`], the markers used to select it and
//! how many times a failure may be retried. Running a scenario drives an
//! already-opened [`SignupPage`] and asserts on the validation outcome.

use crate::data::{TestDataGenerator, INVALID_EMAILS};
use crate::driver::{DeviceDescriptor, Driver};
use crate::reporter::TestAnnotator;
use crate::result::{ensure, ProbeError, ProbeResult};
use crate::signup::{ErrorMessage, SignupForm, SignupPage};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Widest viewport still considered a phone layout
pub const MOBILE_MAX_WIDTH: u64 = 750;

/// Emails exercised by the parametrized invalid-email case
const PARAMETRIZED_EMAILS: usize = 6;

/// Case selection tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    /// Quick health check of the happy path
    Smoke,
    /// Validation behaviour
    Regression,
    /// Phone viewport
    Mobile,
    /// Security code handling
    Security,
}

impl Marker {
    /// All markers
    pub const ALL: [Self; 4] = [Self::Smoke, Self::Regression, Self::Mobile, Self::Security];

    /// Lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Smoke => "smoke",
            Self::Regression => "regression",
            Self::Mobile => "mobile",
            Self::Security => "security",
        }
    }

    /// What the marker selects
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Smoke => "Smoke tests for critical functionality",
            Self::Regression => "Regression tests",
            Self::Mobile => "Mobile responsive tests",
            Self::Security => "Security related tests",
        }
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Marker {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProbeError::Config {
                message: format!("unknown marker {s:?}"),
            })
    }
}

/// Report severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Signup is unusable if this fails
    Critical,
    /// Validation gap
    Normal,
    /// Cosmetic
    Minor,
}

/// Browser session shape a case needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionProfile {
    /// Full-size desktop window
    Desktop,
    /// Phone emulation
    Mobile(DeviceDescriptor),
}

impl SessionProfile {
    /// Device emulated by the session
    #[must_use]
    pub const fn device(&self) -> DeviceDescriptor {
        match self {
            Self::Desktop => DeviceDescriptor::DESKTOP_1080P,
            Self::Mobile(device) => *device,
        }
    }
}

/// What a case does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scenario {
    /// Valid randomized submission passes client validation
    ValidSignup,
    /// A malformed email is flagged
    InvalidEmail {
        /// Email typed
        email: &'static str,
    },
    /// Blank name is flagged as required
    EmptyName,
    /// Blank email is flagged as required
    EmptyEmail,
    /// Wrong security code is rejected
    IncorrectCaptcha,
    /// Submitting without choosing an account type does not break the page
    NoAccountType,
    /// Valid submission on a phone viewport
    MobileSignup,
    /// Phone viewport renders a narrow layout
    MobileLayout,
    /// Account name rule violations are explained
    InvalidAccountName {
        /// Name typed
        value: &'static str,
        /// Fragment the validator text must contain
        expected: &'static str,
    },
    /// Every curated malformed email is flagged and never succeeds
    InvalidEmailSweep,
}

/// One selectable, reportable case
#[derive(Debug, Clone)]
pub struct SignupCase {
    /// Stable name used for filtering and artifact names
    pub name: String,
    /// What runs
    pub scenario: Scenario,
    /// Selection tags
    pub markers: Vec<Marker>,
    /// Extra attempts after a failure
    pub reruns: u32,
    /// Reason the case is not run, if any
    pub skip: Option<&'static str>,
    /// Report grouping
    pub feature: &'static str,
    /// Report sub-grouping
    pub story: &'static str,
    /// Report severity
    pub severity: Severity,
    /// Session shape
    pub profile: SessionProfile,
}

impl SignupCase {
    fn new(name: impl Into<String>, scenario: Scenario, story: &'static str) -> Self {
        Self {
            name: name.into(),
            scenario,
            markers: Vec::new(),
            reruns: 0,
            skip: None,
            feature: "Signup",
            story,
            severity: Severity::Normal,
            profile: SessionProfile::Desktop,
        }
    }

    fn marked(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    const fn reruns(mut self, reruns: u32) -> Self {
        self.reruns = reruns;
        self
    }

    const fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    const fn mobile(mut self) -> Self {
        self.profile = SessionProfile::Mobile(DeviceDescriptor::IPHONE_X);
        self
    }

    const fn skipped(mut self, reason: &'static str) -> Self {
        self.skip = Some(reason);
        self
    }

    /// Whether the case carries `marker`
    #[must_use]
    pub fn has_marker(&self, marker: Marker) -> bool {
        self.markers.contains(&marker)
    }

    /// Drive `page` through the scenario and check the outcome.
    ///
    /// The page must already be open on the signup form, in the session
    /// profile the case asks for.
    ///
    /// # Errors
    ///
    /// [`ProbeError::AssertionFailed`] when the page behaves unexpectedly, or
    /// any interaction error.
    pub async fn run<D: Driver>(
        &self,
        page: &mut SignupPage<D>,
        data: &mut TestDataGenerator,
        annotator: &mut dyn TestAnnotator,
    ) -> ProbeResult<()> {
        debug!(case = %self.name, "running scenario");
        match &self.scenario {
            Scenario::ValidSignup => {
                let form = data.valid_submission();
                submit(page, &form, annotator).await?;
                annotator.step("Verify no validation errors");
                let errors = field_errors(page).await?;
                ensure(
                    errors.is_empty(),
                    format!("validation errors for a valid submission: {errors:?}"),
                )
            }
            Scenario::InvalidEmail { email } => {
                let form = data.baseline_submission().with_email(*email);
                submit(page, &form, annotator).await?;
                annotator.step("Verify email validation error");
                ensure(
                    email_error_shown(page).await?,
                    format!("no email error for {email:?}"),
                )
            }
            Scenario::EmptyName => {
                let form = data.baseline_submission().with_name("");
                submit(page, &form, annotator).await?;
                annotator.step("Verify name required error");
                ensure(
                    page.is_error_displayed(ErrorMessage::NameRequired).await?,
                    "name required error not displayed",
                )?;
                let text = page.error_text(ErrorMessage::NameRequired).await?;
                ensure(
                    text.to_lowercase().contains("required"),
                    format!("unexpected name error text {text:?}"),
                )
            }
            Scenario::EmptyEmail => {
                let form = data.baseline_submission().with_email("");
                submit(page, &form, annotator).await?;
                annotator.step("Verify email required error");
                ensure(
                    page.is_error_displayed(ErrorMessage::EmailRequired).await?,
                    "email required error not displayed",
                )
            }
            Scenario::IncorrectCaptcha => {
                let form = data.baseline_submission().with_captcha("00000");
                submit(page, &form, annotator).await?;
                annotator.step("Verify security code error");
                ensure(
                    page.is_error_displayed(ErrorMessage::Captcha).await?,
                    "security code error not displayed",
                )
            }
            Scenario::NoAccountType => {
                let form = data.baseline_submission().with_account_type("");
                submit(page, &form, annotator).await?;
                annotator.step("Verify page still responds");
                let responsive =
                    page.is_submit_visible().await? || page.is_success_displayed().await?;
                ensure(responsive, "page stopped responding after submit")
            }
            Scenario::MobileSignup => {
                let form = data.valid_submission();
                annotator.step("Verify submit button on mobile");
                ensure(
                    page.is_submit_visible().await?,
                    "submit button not visible on mobile",
                )?;
                submit(page, &form, annotator).await?;
                ensure(
                    page.is_submit_visible().await? || page.is_success_displayed().await?,
                    "form unusable after mobile submit",
                )?;
                let errors = field_errors(page).await?;
                ensure(
                    errors.is_empty(),
                    format!("validation errors on mobile: {errors:?}"),
                )
            }
            Scenario::MobileLayout => {
                annotator.step("Measure viewport width");
                let width = page.viewport_width().await?;
                annotator.attach_text("viewport width", &width.to_string());
                ensure(
                    width <= MOBILE_MAX_WIDTH,
                    format!("viewport is {width}px wide, expected at most {MOBILE_MAX_WIDTH}px"),
                )
            }
            Scenario::InvalidAccountName { value, expected } => {
                let form = data.baseline_submission().with_account_name(*value);
                submit(page, &form, annotator).await?;
                annotator.step("Verify account name error");
                ensure(
                    page.is_error_displayed(ErrorMessage::AccountNameFormat)
                        .await?,
                    format!("no account name error for {value:?}"),
                )?;
                let text = page.error_text(ErrorMessage::AccountNameFormat).await?;
                ensure(
                    text.contains(*expected),
                    format!("account name error {text:?} does not mention {expected:?}"),
                )
            }
            Scenario::InvalidEmailSweep => {
                for email in INVALID_EMAILS {
                    annotator.step(&format!("Try {email:?}"));
                    page.navigate().await?;
                    let form = data.baseline_submission().with_email(email);
                    page.submit_form(&form).await?;
                    ensure(
                        email_error_shown(page).await?,
                        format!("no email error for {email:?}"),
                    )?;
                    ensure(
                        !page.is_success_displayed().await?,
                        format!("signup succeeded with {email:?}"),
                    )?;
                }
                Ok(())
            }
        }
    }
}

async fn submit<D: Driver>(
    page: &mut SignupPage<D>,
    form: &SignupForm,
    annotator: &mut dyn TestAnnotator,
) -> ProbeResult<()> {
    annotator.step("Fill signup form");
    crate::helpers::log_submission(form);
    page.fill_form(form).await?;
    annotator.step("Submit form");
    page.submit().await
}

/// Shown validators other than the security code, which the suite cannot solve
async fn field_errors<D: Driver>(page: &SignupPage<D>) -> ProbeResult<Vec<ErrorMessage>> {
    let mut errors = page.visible_errors().await?;
    errors.retain(|e| *e != ErrorMessage::Captcha);
    Ok(errors)
}

async fn email_error_shown<D: Driver>(page: &SignupPage<D>) -> ProbeResult<bool> {
    Ok(page.is_error_displayed(ErrorMessage::EmailFormat).await?
        || page.is_error_displayed(ErrorMessage::EmailRequired).await?)
}

/// Every case in suite order
#[must_use]
pub fn catalog() -> Vec<SignupCase> {
    let mut cases = vec![SignupCase::new(
        "test_valid_signup_all_fields",
        Scenario::ValidSignup,
        "Valid Registration",
    )
    .marked(Marker::Smoke)
    .reruns(2)
    .severity(Severity::Critical)];

    cases.extend(INVALID_EMAILS.iter().take(PARAMETRIZED_EMAILS).map(|email| {
        SignupCase::new(
            format!("test_invalid_email_format[{email}]"),
            Scenario::InvalidEmail { email: *email },
            "Email Validation",
        )
        .marked(Marker::Regression)
    }));

    cases.push(
        SignupCase::new("test_empty_full_name", Scenario::EmptyName, "Required Fields")
            .marked(Marker::Regression),
    );
    cases.push(
        SignupCase::new("test_empty_email", Scenario::EmptyEmail, "Required Fields")
            .marked(Marker::Regression),
    );
    cases.push(
        SignupCase::new(
            "test_incorrect_security_code",
            Scenario::IncorrectCaptcha,
            "CAPTCHA Validation",
        )
        .marked(Marker::Security)
        .reruns(1)
        .severity(Severity::Critical)
        .skipped("CAPTCHA cannot be validated unattended"),
    );
    cases.push(
        SignupCase::new(
            "test_no_account_type_selected",
            Scenario::NoAccountType,
            "Required Fields",
        )
        .marked(Marker::Regression)
        .severity(Severity::Minor),
    );
    cases.push(
        SignupCase::new("test_mobile_signup", Scenario::MobileSignup, "Mobile Registration")
            .marked(Marker::Mobile)
            .reruns(2)
            .mobile(),
    );
    cases.push(
        SignupCase::new(
            "test_mobile_responsive_layout",
            Scenario::MobileLayout,
            "Mobile Layout",
        )
        .marked(Marker::Mobile)
        .mobile(),
    );

    let account_names: [(&'static str, &'static str); 3] = [
        ("test", "at least 5 characters"),
        ("test name", "No spaces"),
        ("ab", "at least 5 characters"),
    ];
    cases.extend(account_names.into_iter().map(|(value, expected)| {
        SignupCase::new(
            format!("test_invalid_account_name[{value}]"),
            Scenario::InvalidAccountName { value, expected },
            "Account Name Validation",
        )
        .marked(Marker::Regression)
    }));

    cases.push(
        SignupCase::new(
            "test_invalid_email_sweep",
            Scenario::InvalidEmailSweep,
            "Email Validation",
        )
        .marked(Marker::Regression),
    );

    cases
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{MockDom, MockDriver, MockPage};
    use crate::reporter::{NoopAnnotator, RecordingAnnotator};
    use crate::signup::{Field, SimulatedSignupSite, SIGNUP_PATH};
    use std::sync::Arc;
    use std::time::Duration;

    async fn open(site: SimulatedSignupSite, profile: SessionProfile) -> SignupPage<MockDriver> {
        let mut driver = site.into_driver();
        driver.set_device(&profile.device()).await.unwrap();
        let mut page = SignupPage::new(driver, "https://app.swiftassess.com")
            .with_timeout(Duration::from_millis(30));
        page.navigate().await.unwrap();
        page
    }

    async fn run_case(case: &SignupCase, site: SimulatedSignupSite) -> ProbeResult<()> {
        let mut page = open(site, case.profile).await;
        let mut data = TestDataGenerator::seeded(3);
        case.run(&mut page, &mut data, &mut NoopAnnotator).await
    }

    /// Rejects every email and account name, whatever was typed
    #[derive(Default)]
    struct FormatRejectingSite(SimulatedSignupSite);

    impl MockPage for FormatRejectingSite {
        fn render(&self) -> MockDom {
            self.0.render()
        }

        fn on_click(&self, element_id: &str, dom: &mut MockDom) {
            self.0.on_click(element_id, dom);
            if element_id == Field::Submit.element_id() {
                dom.show(ErrorMessage::EmailFormat.element_id());
                dom.show(ErrorMessage::AccountNameFormat.element_id());
            }
        }
    }

    fn find(name: &str) -> SignupCase {
        catalog().into_iter().find(|c| c.name == name).unwrap()
    }

    mod marker_tests {
        use super::*;

        #[test]
        fn test_parse() {
            assert_eq!("smoke".parse::<Marker>().unwrap(), Marker::Smoke);
            assert_eq!("Mobile".parse::<Marker>().unwrap(), Marker::Mobile);
            assert!("slow".parse::<Marker>().is_err());
        }
    }

    mod catalog_tests {
        use super::*;

        #[test]
        fn test_shape() {
            let cases = catalog();
            assert_eq!(cases.len(), 17);
            assert_eq!(
                cases
                    .iter()
                    .filter(|c| matches!(c.scenario, Scenario::InvalidEmail { .. }))
                    .count(),
                6
            );
            let names: std::collections::HashSet<_> = cases.iter().map(|c| &c.name).collect();
            assert_eq!(names.len(), cases.len());
        }

        #[test]
        fn test_markers_and_reruns() {
            let valid = find("test_valid_signup_all_fields");
            assert!(valid.has_marker(Marker::Smoke));
            assert_eq!(valid.reruns, 2);

            let captcha = find("test_incorrect_security_code");
            assert!(captcha.skip.is_some());
            assert_eq!(captcha.reruns, 1);

            let mobile = find("test_mobile_signup");
            assert_eq!(mobile.profile.device().viewport_width, 375);
        }
    }

    mod run_tests {
        use super::*;

        #[tokio::test]
        async fn test_every_runnable_case_passes_on_simulated_site() {
            for case in catalog().iter().filter(|c| c.skip.is_none()) {
                let result = run_case(case, SimulatedSignupSite::new()).await;
                assert!(result.is_ok(), "{}: {result:?}", case.name);
            }
        }

        #[tokio::test]
        async fn test_valid_cases_fail_on_format_errors() {
            for name in ["test_valid_signup_all_fields", "test_mobile_signup"] {
                let case = find(name);
                let mut driver = MockDriver::new();
                driver.mount(SIGNUP_PATH, Arc::new(FormatRejectingSite::default()));
                driver.set_device(&case.profile.device()).await.unwrap();
                let mut page =
                    SignupPage::new(driver, "https://app.swiftassess.com")
                        .with_timeout(Duration::from_millis(30));
                page.navigate().await.unwrap();

                let err = case
                    .run(&mut page, &mut TestDataGenerator::seeded(3), &mut NoopAnnotator)
                    .await
                    .unwrap_err();
                assert!(err.to_string().contains("EmailFormat"), "{name}: {err}");
                assert!(err.to_string().contains("AccountNameFormat"), "{name}: {err}");
            }
        }

        #[tokio::test]
        async fn test_captcha_case_passes_when_run() {
            let case = find("test_incorrect_security_code");
            assert!(run_case(&case, SimulatedSignupSite::new()).await.is_ok());
        }

        #[tokio::test]
        async fn test_layout_fails_on_desktop() {
            let mut case = find("test_mobile_responsive_layout");
            case.profile = SessionProfile::Desktop;
            let err = run_case(&case, SimulatedSignupSite::new()).await.unwrap_err();
            assert!(err.to_string().contains("1920px"));
        }

        #[tokio::test]
        async fn test_steps_are_recorded() {
            let case = find("test_empty_email");
            let mut page = open(SimulatedSignupSite::new(), case.profile).await;
            let mut annotator = RecordingAnnotator::new();
            case.run(&mut page, &mut TestDataGenerator::seeded(1), &mut annotator)
                .await
                .unwrap();
            let steps: Vec<&str> = annotator.steps().iter().map(String::as_str).collect();
            assert_eq!(
                steps,
                ["Fill signup form", "Submit form", "Verify email required error"]
            );
        }
    }
}
