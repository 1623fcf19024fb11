//! Suite execution: session lifecycle, re-runs, filtering and reporting.
//!
//! Every attempt of every case gets a fresh browser session from a
//! [`DriverFactory`]. A failed attempt is re-run until the case's re-run
//! budget is spent; the final failure is screenshotted and recorded.

use crate::artifacts::ArtifactStore;
use crate::config::SuiteConfig;
use crate::data::TestDataGenerator;
use crate::driver::{Driver, DriverConfig, MockDriver, Screenshot};
use crate::reporter::{annotator, Reporter, TestAnnotator, TestResultEntry, REPORT_TITLE};
use crate::result::{ProbeError, ProbeResult};
use crate::scenario::{Marker, SignupCase};
use crate::signup::{SignupPage, SimulatedSignupSite};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Element wait used against the simulated site
pub const SIMULATED_SETTLE: Duration = Duration::from_millis(250);

/// Opens browser sessions
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Session type produced
    type Driver: Driver + 'static;

    /// Open a session configured by `config`
    async fn launch(&self, config: &DriverConfig) -> ProbeResult<Self::Driver>;

    /// Element wait to use given the configured one
    fn element_timeout(&self, configured: Duration) -> Duration {
        configured
    }

    /// Short name for banners
    fn name(&self) -> &'static str;
}

/// Sessions against the in-memory signup site
#[derive(Debug, Clone)]
pub struct SimulatedFactory {
    site: SimulatedSignupSite,
    settle: Duration,
}

impl Default for SimulatedFactory {
    fn default() -> Self {
        Self::new(SimulatedSignupSite::new())
    }
}

impl SimulatedFactory {
    /// Factory serving `site`
    #[must_use]
    pub const fn new(site: SimulatedSignupSite) -> Self {
        Self {
            site,
            settle: SIMULATED_SETTLE,
        }
    }

    /// Cap element waits at `settle`
    #[must_use]
    pub const fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }
}

#[async_trait]
impl DriverFactory for SimulatedFactory {
    type Driver = MockDriver;

    async fn launch(&self, config: &DriverConfig) -> ProbeResult<MockDriver> {
        let mut driver = self.site.clone().into_driver();
        driver.set_device(&config.device).await?;
        Ok(driver)
    }

    // the simulated DOM settles synchronously
    fn element_timeout(&self, configured: Duration) -> Duration {
        configured.min(self.settle)
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

/// Sessions in a real Chromium
#[cfg(feature = "browser")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromiumFactory;

#[cfg(feature = "browser")]
#[async_trait]
impl DriverFactory for ChromiumFactory {
    type Driver = crate::browser::ChromiumDriver;

    async fn launch(&self, config: &DriverConfig) -> ProbeResult<Self::Driver> {
        crate::browser::ChromiumDriver::launch(config).await
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

/// Case selection by marker and name keyword
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    markers: Vec<Marker>,
    keyword: Option<String>,
}

impl CaseFilter {
    /// Filter accepting every case
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require one of `markers` (no markers means any)
    #[must_use]
    pub fn with_markers(mut self, markers: impl IntoIterator<Item = Marker>) -> Self {
        self.markers.extend(markers);
        self
    }

    /// Require the name to contain `keyword`; a leading `not ` inverts it
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        self.keyword = (!keyword.trim().is_empty()).then_some(keyword);
        self
    }

    /// Whether `case` is selected
    #[must_use]
    pub fn matches(&self, case: &SignupCase) -> bool {
        let marked = self.markers.is_empty() || self.markers.iter().any(|m| case.has_marker(*m));
        let named = match self.keyword.as_deref().map(str::trim) {
            None => true,
            Some(k) => match k.strip_prefix("not ") {
                Some(excluded) => !contains_ignore_case(&case.name, excluded.trim()),
                None => contains_ignore_case(&case.name, k),
            },
        };
        marked && named
    }

    /// Selected cases, in order
    #[must_use]
    pub fn apply(&self, cases: Vec<SignupCase>) -> Vec<SignupCase> {
        cases.into_iter().filter(|c| self.matches(c)).collect()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Progress hooks called by [`SuiteRunner::run`]
pub trait RunObserver {
    /// Before the first case
    fn suite_started(&mut self, _total: usize) {}

    /// Before a case's first attempt
    fn case_started(&mut self, _case: &SignupCase) {}

    /// After a failed attempt that will be re-run
    fn case_retrying(&mut self, _case: &SignupCase, _attempt: u32, _error: &ProbeError) {}

    /// After a case is recorded
    fn case_finished(&mut self, _entry: &TestResultEntry) {}

    /// After the last case
    fn suite_finished(&mut self, _reporter: &Reporter) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

struct Attempt {
    outcome: ProbeResult<()>,
    screenshot: Option<Screenshot>,
}

/// Runs cases against sessions from a [`DriverFactory`]
#[derive(Debug)]
pub struct SuiteRunner<F: DriverFactory> {
    factory: F,
    config: SuiteConfig,
    artifacts: ArtifactStore,
    data: TestDataGenerator,
}

impl<F: DriverFactory> SuiteRunner<F> {
    /// Runner writing artifacts to the configured directories
    #[must_use]
    pub fn new(factory: F, config: SuiteConfig) -> Self {
        let artifacts = ArtifactStore::new(&config.screenshot_dir, &config.report_dir);
        Self {
            factory,
            config,
            artifacts,
            data: TestDataGenerator::new(),
        }
    }

    /// Use `data` for submissions
    #[must_use]
    pub fn with_data(mut self, data: TestDataGenerator) -> Self {
        self.data = data;
        self
    }

    /// Configuration in effect
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Output directories
    #[must_use]
    pub const fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Run `cases` in order and collect their results.
    ///
    /// Case failures are recorded, not returned. With `fail_fast` the run
    /// stops after the first recorded failure.
    ///
    /// # Errors
    ///
    /// Returns error only if the artifact directories cannot be created.
    pub async fn run(
        &mut self,
        cases: &[SignupCase],
        observer: &mut dyn RunObserver,
    ) -> ProbeResult<Reporter> {
        self.artifacts.prepare()?;

        let mut reporter = if self.config.fail_fast {
            Reporter::stop_on_first()
        } else {
            Reporter::new()
        }
        .with_title(REPORT_TITLE)
        .with_tested_url(self.config.signup_url());

        info!(
            run_id = %reporter.run_id(),
            driver = self.factory.name(),
            url = %self.config.signup_url(),
            cases = cases.len(),
            "starting signup suite"
        );
        observer.suite_started(cases.len());

        let mut annotations = annotator(self.config.annotate);
        for case in cases {
            observer.case_started(case);
            let entry = self.run_case(case, annotations.as_mut(), observer).await;
            observer.case_finished(&entry);
            if let Err(e) = reporter.record(entry) {
                warn!(error = %e, "fail-fast: stopping suite");
                break;
            }
        }

        info!(
            run_id = %reporter.run_id(),
            passed = reporter.passed_count(),
            failed = reporter.failed_count(),
            skipped = reporter.skipped_count(),
            "signup suite finished"
        );
        observer.suite_finished(&reporter);
        Ok(reporter)
    }

    async fn run_case(
        &mut self,
        case: &SignupCase,
        annotator: &mut dyn TestAnnotator,
        observer: &mut dyn RunObserver,
    ) -> TestResultEntry {
        let markers = case.markers.iter().map(Marker::as_str);
        if let Some(reason) = case.skip {
            info!(case = %case.name, reason, "skipped");
            return TestResultEntry::skipped(&case.name, reason).with_markers(markers);
        }

        let attempts = 1 + self.config.reruns.unwrap_or(case.reruns);
        let started = Instant::now();
        info!(case = %case.name, attempts, "case started");

        let mut attempt = 1;
        loop {
            annotator.label("feature", case.feature);
            annotator.label("story", case.story);
            annotator.label("severity", &format!("{:?}", case.severity).to_lowercase());

            let Attempt {
                outcome,
                screenshot,
            } = self.attempt(case, annotator).await;

            match outcome {
                Ok(()) => {
                    info!(case = %case.name, attempt, "passed");
                    return TestResultEntry::passed(&case.name, started.elapsed())
                        .with_attempts(attempt)
                        .with_markers(markers)
                        .with_annotations(annotator.take());
                }
                Err(e) if attempt < attempts => {
                    warn!(case = %case.name, attempt, error = %e, "re-running failed case");
                    observer.case_retrying(case, attempt, &e);
                    let _ = annotator.take();
                    attempt += 1;
                }
                Err(e) => {
                    warn!(case = %case.name, attempt, error = %e, "failed");
                    let mut entry = TestResultEntry::failed(&case.name, started.elapsed(), e.to_string())
                        .with_attempts(attempt)
                        .with_markers(markers);
                    if let Some(shot) = screenshot {
                        annotator.attach_png("failure screenshot", &shot.data);
                        match self.artifacts.save_screenshot(&case.name, &shot) {
                            Ok(path) => entry = entry.with_screenshot(path, shot.data),
                            Err(save) => warn!(error = %save, "could not save screenshot"),
                        }
                    }
                    return entry.with_annotations(annotator.take());
                }
            }
        }
    }

    async fn attempt(&mut self, case: &SignupCase, annotator: &mut dyn TestAnnotator) -> Attempt {
        let driver_config = self.config.driver_config(case.profile.device());
        let driver = match self.factory.launch(&driver_config).await {
            Ok(driver) => driver,
            Err(e) => {
                return Attempt {
                    outcome: Err(e),
                    screenshot: None,
                }
            }
        };

        let timeout = self.factory.element_timeout(self.config.timeout);
        let mut page = SignupPage::new(driver, &self.config.base_url).with_timeout(timeout);

        let outcome = match page.navigate().await {
            Ok(()) => case.run(&mut page, &mut self.data, annotator).await,
            Err(e) => Err(e),
        };

        let screenshot = if outcome.is_err() {
            match page.driver().screenshot().await {
                Ok(shot) => Some(shot),
                Err(e) => {
                    warn!(error = %e, "failure screenshot unavailable");
                    None
                }
            }
        } else {
            None
        };

        let mut driver = page.into_driver();
        if let Err(e) = crate::helpers::clear_browser_data(&mut driver).await {
            warn!(error = %e, "could not clear browser data");
        }
        if let Err(e) = driver.close().await {
            warn!(error = %e, "could not close session");
        }

        Attempt {
            outcome,
            screenshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::TestStatus;
    use crate::scenario::catalog;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn config(dir: &tempfile::TempDir) -> SuiteConfig {
        SuiteConfig::new()
            .with_screenshot_dir(dir.path().join("shots"))
            .with_report_dir(dir.path().join("results"))
            .with_timeout(Duration::from_millis(40))
    }

    fn simulated() -> SimulatedFactory {
        SimulatedFactory::default().with_settle(Duration::from_millis(40))
    }

    fn named(name: &str) -> Vec<SignupCase> {
        catalog().into_iter().filter(|c| c.name == name).collect()
    }

    /// Factory whose sessions always fail to start
    struct Unreachable {
        launches: Arc<AtomicU32>,
    }

    #[async_trait]
    impl DriverFactory for Unreachable {
        type Driver = MockDriver;

        async fn launch(&self, _config: &DriverConfig) -> ProbeResult<MockDriver> {
            let _ = self.launches.fetch_add(1, Ordering::SeqCst);
            let mut driver = MockDriver::new();
            driver.offline = true;
            Ok(driver)
        }

        fn name(&self) -> &'static str {
            "unreachable"
        }
    }

    #[derive(Default)]
    struct Counting {
        started: usize,
        retries: u32,
        finished: usize,
    }

    impl RunObserver for Counting {
        fn case_started(&mut self, _case: &SignupCase) {
            self.started += 1;
        }

        fn case_retrying(&mut self, _case: &SignupCase, _attempt: u32, _error: &ProbeError) {
            self.retries += 1;
        }

        fn case_finished(&mut self, _entry: &TestResultEntry) {
            self.finished += 1;
        }
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn test_marker_filter() {
            let selected = CaseFilter::new()
                .with_markers([Marker::Smoke])
                .apply(catalog());
            assert_eq!(selected.len(), 1);
            assert_eq!(selected[0].name, "test_valid_signup_all_fields");

            let mobile = CaseFilter::new()
                .with_markers([Marker::Mobile, Marker::Security])
                .apply(catalog());
            assert_eq!(mobile.len(), 3);
        }

        #[test]
        fn test_keyword_filter() {
            let emails = CaseFilter::new().with_keyword("EMAIL").apply(catalog());
            assert!(emails.iter().all(|c| c.name.contains("email")));
            assert_eq!(emails.len(), 8);

            let rest = CaseFilter::new().with_keyword("not email").apply(catalog());
            assert_eq!(rest.len(), catalog().len() - 8);
        }

        #[test]
        fn test_blank_keyword_ignored() {
            assert_eq!(
                CaseFilter::new().with_keyword("  ").apply(catalog()).len(),
                catalog().len()
            );
        }
    }

    mod run_tests {
        use super::*;

        #[tokio::test]
        async fn test_full_catalog_on_simulated_site() {
            let dir = tempfile::tempdir().unwrap();
            let mut runner =
                SuiteRunner::new(simulated(), config(&dir)).with_data(TestDataGenerator::seeded(9));
            let mut observer = Counting::default();
            let reporter = runner.run(&catalog(), &mut observer).await.unwrap();

            assert_eq!(reporter.total_count(), 17);
            assert_eq!(reporter.skipped_count(), 1);
            assert!(reporter.all_passed(), "{}", reporter.summary());
            assert_eq!(observer.started, 17);
            assert_eq!(observer.finished, 17);
            assert_eq!(observer.retries, 0);
            assert!(dir.path().join("results").is_dir());
        }

        #[tokio::test]
        async fn test_annotations_recorded() {
            let dir = tempfile::tempdir().unwrap();
            let mut runner = SuiteRunner::new(simulated(), config(&dir));
            let reporter = runner
                .run(&named("test_empty_email"), &mut NoopObserver)
                .await
                .unwrap();
            let entry = &reporter.results()[0];
            assert_eq!(entry.annotations.labels["story"], "Required Fields");
            assert_eq!(entry.annotations.labels["severity"], "normal");
            assert!(!entry.annotations.steps.is_empty());
        }

        #[tokio::test]
        async fn test_annotations_disabled() {
            let dir = tempfile::tempdir().unwrap();
            let mut runner =
                SuiteRunner::new(simulated(), config(&dir).with_annotations(false));
            let reporter = runner
                .run(&named("test_empty_email"), &mut NoopObserver)
                .await
                .unwrap();
            assert!(reporter.results()[0].annotations.is_empty());
        }

        #[tokio::test]
        async fn test_reruns_then_failure_screenshot() {
            let dir = tempfile::tempdir().unwrap();
            let launches = Arc::new(AtomicU32::new(0));
            let factory = Unreachable {
                launches: Arc::clone(&launches),
            };
            let mut runner = SuiteRunner::new(factory, config(&dir));
            let mut observer = Counting::default();
            let reporter = runner
                .run(&named("test_valid_signup_all_fields"), &mut observer)
                .await
                .unwrap();

            let entry = &reporter.results()[0];
            assert_eq!(entry.status, TestStatus::Failed);
            assert_eq!(entry.attempts, 3);
            assert_eq!(launches.load(Ordering::SeqCst), 3);
            assert_eq!(observer.retries, 2);
            let path = entry.screenshot_path.as_ref().unwrap();
            assert!(path.exists());
            assert!(entry.error.as_deref().unwrap().contains("Navigation"));
        }

        #[tokio::test]
        async fn test_rerun_override() {
            let dir = tempfile::tempdir().unwrap();
            let launches = Arc::new(AtomicU32::new(0));
            let factory = Unreachable {
                launches: Arc::clone(&launches),
            };
            let mut runner = SuiteRunner::new(factory, config(&dir).with_reruns(0));
            let _ = runner
                .run(&named("test_mobile_signup"), &mut NoopObserver)
                .await
                .unwrap();
            assert_eq!(launches.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_fail_fast_stops() {
            let dir = tempfile::tempdir().unwrap();
            let factory = Unreachable {
                launches: Arc::new(AtomicU32::new(0)),
            };
            let mut runner = SuiteRunner::new(
                factory,
                config(&dir).with_fail_fast(true).with_reruns(0),
            );
            let reporter = runner.run(&catalog(), &mut NoopObserver).await.unwrap();
            assert_eq!(reporter.total_count(), 1);
            assert_eq!(reporter.failed_count(), 1);
        }

        #[tokio::test]
        async fn test_skipped_case_never_launches() {
            let dir = tempfile::tempdir().unwrap();
            let launches = Arc::new(AtomicU32::new(0));
            let factory = Unreachable {
                launches: Arc::clone(&launches),
            };
            let mut runner = SuiteRunner::new(factory, config(&dir));
            let reporter = runner
                .run(&named("test_incorrect_security_code"), &mut NoopObserver)
                .await
                .unwrap();
            assert_eq!(reporter.skipped_count(), 1);
            assert_eq!(launches.load(Ordering::SeqCst), 0);
        }
    }
}
