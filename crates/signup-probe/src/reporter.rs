//! Reporter - Suite Results, Annotations and Report Files
//!
//! Collects one [`TestResultEntry`] per case and renders them as HTML (with
//! failure screenshots inlined), JSON and JUnit XML.
//!
//! Cases describe themselves through a [`TestAnnotator`]: steps, labels and
//! attachments. The runner picks [`RecordingAnnotator`] when annotations feed
//! the report and [`NoopAnnotator`] when they are switched off.
//!
//! With [`FailureMode::StopOnFirst`], recording a failure returns an error so
//! the runner can stop the line.

use crate::result::{ProbeError, ProbeResult};
use base64::Engine as _;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

/// Title of generated reports
pub const REPORT_TITLE: &str = "SwiftAssess Signup Automation Test Report";

// ============================================================================
// ANNOTATIONS
// ============================================================================

/// Attachment body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum AttachmentBody {
    /// Plain text
    Text(String),
    /// PNG image, base64 in serialized form
    Png(#[serde(with = "base64_bytes")] Vec<u8>),
}

/// Named attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Display name
    pub name: String,
    /// Content
    pub body: AttachmentBody,
}

/// Everything a case reported about itself
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    /// Steps in execution order
    pub steps: Vec<String>,
    /// Key/value labels (feature, story, severity, ...)
    pub labels: BTreeMap<String, String>,
    /// Attachments
    pub attachments: Vec<Attachment>,
}

impl Annotations {
    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.labels.is_empty() && self.attachments.is_empty()
    }
}

/// Sink for per-case report metadata
pub trait TestAnnotator: Send {
    /// Mark the start of a step
    fn step(&mut self, name: &str);

    /// Attach a label
    fn label(&mut self, key: &str, value: &str);

    /// Attach text
    fn attach_text(&mut self, name: &str, body: &str);

    /// Attach a PNG
    fn attach_png(&mut self, name: &str, png: &[u8]);

    /// Hand over what was recorded since the last call
    fn take(&mut self) -> Annotations;
}

/// Annotator that keeps everything for the report
#[derive(Debug, Clone, Default)]
pub struct RecordingAnnotator {
    recorded: Annotations,
}

impl RecordingAnnotator {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps recorded so far
    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.recorded.steps
    }
}

impl TestAnnotator for RecordingAnnotator {
    fn step(&mut self, name: &str) {
        tracing::debug!(step = name, "step");
        self.recorded.steps.push(name.to_string());
    }

    fn label(&mut self, key: &str, value: &str) {
        let _ = self
            .recorded
            .labels
            .insert(key.to_string(), value.to_string());
    }

    fn attach_text(&mut self, name: &str, body: &str) {
        self.recorded.attachments.push(Attachment {
            name: name.to_string(),
            body: AttachmentBody::Text(body.to_string()),
        });
    }

    fn attach_png(&mut self, name: &str, png: &[u8]) {
        self.recorded.attachments.push(Attachment {
            name: name.to_string(),
            body: AttachmentBody::Png(png.to_vec()),
        });
    }

    fn take(&mut self) -> Annotations {
        std::mem::take(&mut self.recorded)
    }
}

/// Annotator that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnnotator;

impl TestAnnotator for NoopAnnotator {
    fn step(&mut self, _name: &str) {}

    fn label(&mut self, _key: &str, _value: &str) {}

    fn attach_text(&mut self, _name: &str, _body: &str) {}

    fn attach_png(&mut self, _name: &str, _png: &[u8]) {}

    fn take(&mut self) -> Annotations {
        Annotations::default()
    }
}

/// Pick the annotator once, at configuration time
#[must_use]
pub fn annotator(enabled: bool) -> Box<dyn TestAnnotator> {
    if enabled {
        Box::new(RecordingAnnotator::new())
    } else {
        Box::new(NoopAnnotator)
    }
}

mod base64_bytes {
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(d)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// What happens when a case fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Stop the run at the first failure
    StopOnFirst,
    /// Run everything and report all failures
    #[default]
    CollectAll,
}

/// Test result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Test passed
    Passed,
    /// Test failed on every attempt
    Failed,
    /// Test was skipped
    Skipped,
}

impl TestStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    const fn css_class(self) -> &'static str {
        match self {
            Self::Passed => "pass",
            Self::Failed => "fail",
            Self::Skipped => "skip",
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
        })
    }
}

/// Individual test result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResultEntry {
    /// Case name
    pub name: String,
    /// Final status
    pub status: TestStatus,
    /// Wall time across all attempts
    pub duration: Duration,
    /// Attempts made (1 + re-runs used)
    pub attempts: u32,
    /// Error message of the last failed attempt, or skip reason
    pub error: Option<String>,
    /// Markers on the case
    pub markers: Vec<String>,
    /// Failure screenshot written to disk
    pub screenshot_path: Option<PathBuf>,
    /// Failure screenshot bytes, inlined into the HTML report
    #[serde(skip)]
    pub screenshot_png: Option<Vec<u8>>,
    /// What the case reported about itself
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
    /// When the case finished
    pub finished_at: DateTime<Local>,
}

impl TestResultEntry {
    fn base(name: impl Into<String>, status: TestStatus, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status,
            duration,
            attempts: 1,
            error: None,
            markers: Vec::new(),
            screenshot_path: None,
            screenshot_png: None,
            annotations: Annotations::default(),
            finished_at: Local::now(),
        }
    }

    /// Create a passing test result
    #[must_use]
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self::base(name, TestStatus::Passed, duration)
    }

    /// Create a failing test result
    #[must_use]
    pub fn failed(name: impl Into<String>, duration: Duration, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::base(name, TestStatus::Failed, duration)
        }
    }

    /// Create a skipped test result
    #[must_use]
    pub fn skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::base(name, TestStatus::Skipped, Duration::ZERO)
        }
    }

    /// Record how many attempts were made
    #[must_use]
    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Attach markers
    #[must_use]
    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.markers = markers.into_iter().map(|m| m.to_string()).collect();
        self
    }

    /// Attach the failure screenshot
    #[must_use]
    pub fn with_screenshot(mut self, path: PathBuf, png: Vec<u8>) -> Self {
        self.screenshot_path = Some(path);
        self.screenshot_png = Some(png);
        self
    }

    /// Attach annotations
    #[must_use]
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }
}

// ============================================================================
// REPORTER
// ============================================================================

/// Test reporter
///
/// Collects results for one run and renders them. In
/// [`FailureMode::StopOnFirst`] mode, [`Reporter::record`] returns an error
/// for the first failing result.
#[derive(Debug)]
pub struct Reporter {
    results: Vec<TestResultEntry>,
    failure_mode: FailureMode,
    title: String,
    tested_url: String,
    run_id: Uuid,
    started_at: DateTime<Local>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    /// Create new reporter (collect-all mode)
    #[must_use]
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
            failure_mode: FailureMode::CollectAll,
            title: REPORT_TITLE.to_string(),
            tested_url: String::new(),
            run_id: Uuid::new_v4(),
            started_at: Local::now(),
        }
    }

    /// Create reporter that stops at the first failure
    #[must_use]
    pub fn stop_on_first() -> Self {
        Self {
            failure_mode: FailureMode::StopOnFirst,
            ..Self::new()
        }
    }

    /// Set report title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the URL under test shown in the summary
    #[must_use]
    pub fn with_tested_url(mut self, url: impl Into<String>) -> Self {
        self.tested_url = url.into();
        self
    }

    /// Unique id of this run
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Failure mode
    #[must_use]
    pub const fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    /// Record a test result
    ///
    /// # Errors
    ///
    /// In [`FailureMode::StopOnFirst`] mode, returns an error if the case failed.
    pub fn record(&mut self, result: TestResultEntry) -> ProbeResult<()> {
        let failure = result
            .status
            .is_failed()
            .then(|| (result.name.clone(), result.error.clone().unwrap_or_default()));

        self.results.push(result);

        match (self.failure_mode, failure) {
            (FailureMode::StopOnFirst, Some((name, error))) => Err(ProbeError::AssertionFailed {
                message: format!("stopping after '{name}' failed: {error}"),
            }),
            _ => Ok(()),
        }
    }

    /// Get number of passed tests
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_passed()).count()
    }

    /// Get number of failed tests
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_failed()).count()
    }

    /// Get number of skipped tests
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == TestStatus::Skipped)
            .count()
    }

    /// Get total test count
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    /// Pass rate over executed (non-skipped) cases, 0.0 to 1.0
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        let executed = self.passed_count() + self.failed_count();
        if executed == 0 {
            return 1.0;
        }
        self.passed_count() as f64 / executed as f64
    }

    /// Check if all tests passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Get total duration
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }

    /// Get test results
    #[must_use]
    pub fn results(&self) -> &[TestResultEntry] {
        &self.results
    }

    /// Get failing tests
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResultEntry> {
        self.results
            .iter()
            .filter(|r| r.status.is_failed())
            .collect()
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped in {:.2}s",
            self.passed_count(),
            self.failed_count(),
            self.skipped_count(),
            self.total_duration().as_secs_f64()
        )
    }

    /// Write `report.html`, `report.json` and `report.xml` into `dir`
    ///
    /// # Errors
    ///
    /// Returns error if the directory or a file cannot be written.
    pub fn write_all(&self, dir: &Path) -> ProbeResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let html = dir.join("report.html");
        let json = dir.join("report.json");
        let junit = dir.join("report.xml");
        std::fs::write(&html, self.render_html())?;
        std::fs::write(&json, self.render_json()?)?;
        std::fs::write(&junit, self.render_junit())?;
        Ok(vec![html, json, junit])
    }

    /// Render the JSON report
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn render_json(&self) -> ProbeResult<String> {
        let report = serde_json::json!({
            "title": self.title,
            "run_id": self.run_id,
            "tested_url": self.tested_url,
            "started_at": self.started_at,
            "summary": {
                "total": self.total_count(),
                "passed": self.passed_count(),
                "failed": self.failed_count(),
                "skipped": self.skipped_count(),
                "duration_secs": self.total_duration().as_secs_f64(),
            },
            "results": self.results,
        });
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Render HTML report content
    #[must_use]
    pub fn render_html(&self) -> String {
        let mut html = String::new();

        html.push_str(&format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; }}
        .summary {{ background: #f5f5f5; padding: 20px; border-radius: 8px; margin-bottom: 20px; }}
        .progress-bar {{ background: #ddd; height: 20px; border-radius: 10px; overflow: hidden; }}
        .passed {{ background: #4caf50; height: 100%; }}
        .test {{ padding: 10px; margin: 5px 0; border-radius: 4px; }}
        .test.pass {{ background: #e8f5e9; border-left: 4px solid #4caf50; }}
        .test.fail {{ background: #ffebee; border-left: 4px solid #f44336; }}
        .test.skip {{ background: #fff3e0; border-left: 4px solid #ff9800; }}
        .marker {{ font-size: 0.8em; background: #e0e0e0; padding: 1px 6px; border-radius: 8px; margin-left: 4px; }}
        .error {{ color: #d32f2f; font-family: monospace; white-space: pre-wrap; }}
        .test img {{ max-width: 480px; border: 1px solid #ddd; margin-top: 8px; }}
    </style>
</head>
<body>
"#,
            title = escape_html(&self.title)
        ));

        html.push_str(&format!(
            r#"<div class="summary">
    <h1>{title}</h1>
    <p>Execution date: {date}</p>
    <p>Tested URL: {url}</p>
    <p>Run: {run_id}</p>
    <h2>Results: {passed}/{executed} passed ({rate:.1}%), {skipped} skipped</h2>
    <div class="progress-bar">
        <div class="passed" style="width: {rate:.1}%"></div>
    </div>
    <p>Duration: {secs:.2}s</p>
</div>
"#,
            title = escape_html(&self.title),
            date = self.started_at.format("%Y-%m-%d %H:%M:%S"),
            url = escape_html(&self.tested_url),
            run_id = self.run_id,
            passed = self.passed_count(),
            executed = self.passed_count() + self.failed_count(),
            skipped = self.skipped_count(),
            rate = self.pass_rate() * 100.0,
            secs = self.total_duration().as_secs_f64()
        ));

        html.push_str("<h2>Test Results</h2>\n");
        for result in &self.results {
            html.push_str(&format!(
                r#"<div class="test {class}">
    <strong>{name}</strong> - {status} ({ms:.0}ms, {attempts} attempt(s))"#,
                class = result.status.css_class(),
                name = escape_html(&result.name),
                status = result.status,
                ms = result.duration.as_secs_f64() * 1000.0,
                attempts = result.attempts,
            ));
            for marker in &result.markers {
                html.push_str(&format!(r#"<span class="marker">{}</span>"#, escape_html(marker)));
            }
            html.push('\n');

            if let Some(error) = &result.error {
                html.push_str(&format!(
                    "    <div class=\"error\">{}</div>\n",
                    escape_html(error)
                ));
            }
            if !result.annotations.steps.is_empty() {
                html.push_str("    <ol>\n");
                for step in &result.annotations.steps {
                    html.push_str(&format!("        <li>{}</li>\n", escape_html(step)));
                }
                html.push_str("    </ol>\n");
            }
            if let Some(png) = &result.screenshot_png {
                html.push_str(&format!(
                    "    <img alt=\"failure screenshot\" src=\"data:image/png;base64,{}\">\n",
                    base64::engine::general_purpose::STANDARD.encode(png)
                ));
            }

            html.push_str("</div>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    /// Render JUnit XML content for CI
    #[must_use]
    pub fn render_junit(&self) -> String {
        let mut xml = String::new();

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<testsuite name="{}" tests="{}" failures="{}" skipped="{}" time="{:.3}">"#,
            escape_html(&self.title),
            self.total_count(),
            self.failed_count(),
            self.skipped_count(),
            self.total_duration().as_secs_f64()
        ));
        xml.push('\n');

        for result in &self.results {
            xml.push_str(&format!(
                r#"  <testcase name="{}" time="{:.3}">"#,
                escape_html(&result.name),
                result.duration.as_secs_f64()
            ));
            xml.push('\n');

            match (result.status, &result.error) {
                (TestStatus::Failed, Some(error)) => {
                    xml.push_str(&format!(
                        "    <failure message=\"{0}\">{0}</failure>\n",
                        escape_html(error)
                    ));
                }
                (TestStatus::Skipped, reason) => {
                    xml.push_str(&format!(
                        "    <skipped message=\"{}\"/>\n",
                        escape_html(reason.as_deref().unwrap_or_default())
                    ));
                }
                _ => {}
            }

            xml.push_str("  </testcase>\n");
        }

        xml.push_str("</testsuite>\n");
        xml
    }
}

/// Escape markup special characters (valid for both HTML and XML)
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    mod annotator_tests {
        use super::*;

        #[test]
        fn test_recording_collects_and_drains() {
            let mut annotator = RecordingAnnotator::new();
            annotator.step("Fill signup form");
            annotator.label("feature", "Signup");
            annotator.attach_text("viewport width", "375");
            assert_eq!(annotator.steps(), ["Fill signup form"]);

            let taken = annotator.take();
            assert_eq!(taken.labels.get("feature").map(String::as_str), Some("Signup"));
            assert_eq!(taken.attachments.len(), 1);
            assert!(annotator.take().is_empty());
        }

        #[test]
        fn test_noop_records_nothing() {
            let mut annotator = NoopAnnotator;
            annotator.step("x");
            annotator.attach_png("shot", &[1, 2, 3]);
            assert!(annotator.take().is_empty());
        }

        #[test]
        fn test_choice_at_config_time() {
            let mut on = annotator(true);
            on.step("a");
            assert_eq!(on.take().steps, ["a"]);

            let mut off = annotator(false);
            off.step("a");
            assert!(off.take().is_empty());
        }

        #[test]
        fn test_png_attachment_serializes_as_base64() {
            let attachment = Attachment {
                name: "shot".to_string(),
                body: AttachmentBody::Png(vec![0x89, b'P', b'N', b'G']),
            };
            let json = serde_json::to_value(&attachment).unwrap();
            assert_eq!(json["body"]["kind"], "png");
            assert_eq!(json["body"]["data"], "iVBORw==");
            let back: Attachment = serde_json::from_value(json).unwrap();
            assert_eq!(back, attachment);
        }
    }

    mod result_tests {
        use super::*;

        #[test]
        fn test_constructors() {
            let passed = TestResultEntry::passed("a", Duration::from_millis(5));
            assert!(passed.status.is_passed());
            assert_eq!(passed.attempts, 1);

            let failed = TestResultEntry::failed("b", Duration::ZERO, "boom").with_attempts(3);
            assert!(failed.status.is_failed());
            assert_eq!(failed.attempts, 3);

            let skipped = TestResultEntry::skipped("c", "CAPTCHA");
            assert_eq!(skipped.status, TestStatus::Skipped);
            assert_eq!(skipped.error.as_deref(), Some("CAPTCHA"));
        }

        #[test]
        fn test_markers() {
            let entry = TestResultEntry::passed("a", Duration::ZERO).with_markers(["smoke"]);
            assert_eq!(entry.markers, ["smoke"]);
        }
    }

    mod reporter_tests {
        use super::*;

        fn sample() -> Reporter {
            let mut reporter = Reporter::new().with_tested_url("https://app.swiftassess.com/Signup");
            reporter
                .record(TestResultEntry::passed("test_empty_email", Duration::from_millis(120)))
                .unwrap();
            reporter
                .record(
                    TestResultEntry::failed("test_mobile <layout>", Duration::from_millis(80), "1920 > 750")
                        .with_screenshot(PathBuf::from("s.png"), vec![1, 2, 3]),
                )
                .unwrap();
            reporter
                .record(TestResultEntry::skipped("test_incorrect_security_code", "CAPTCHA"))
                .unwrap();
            reporter
        }

        #[test]
        fn test_counts() {
            let reporter = sample();
            assert_eq!(reporter.total_count(), 3);
            assert_eq!(reporter.passed_count(), 1);
            assert_eq!(reporter.failed_count(), 1);
            assert_eq!(reporter.skipped_count(), 1);
            assert!((reporter.pass_rate() - 0.5).abs() < f64::EPSILON);
            assert!(!reporter.all_passed());
            assert_eq!(reporter.failures().len(), 1);
            assert!(reporter.summary().starts_with("1 passed, 1 failed, 1 skipped"));
        }

        #[test]
        fn test_empty_pass_rate() {
            let reporter = Reporter::new();
            assert!((reporter.pass_rate() - 1.0).abs() < f64::EPSILON);
            assert!(reporter.all_passed());
        }

        #[test]
        fn test_stop_on_first() {
            let mut reporter = Reporter::stop_on_first();
            assert!(reporter
                .record(TestResultEntry::passed("ok", Duration::ZERO))
                .is_ok());
            let err = reporter
                .record(TestResultEntry::failed("bad", Duration::ZERO, "boom"))
                .unwrap_err();
            assert!(err.to_string().contains("'bad'"));
            assert_eq!(reporter.total_count(), 2);
        }

        #[test]
        fn test_render_html() {
            let html = sample().render_html();
            assert!(html.contains(REPORT_TITLE));
            assert!(html.contains("Tested URL: https://app.swiftassess.com/Signup"));
            assert!(html.contains("test_mobile &lt;layout&gt;"));
            assert!(html.contains("data:image/png;base64,AQID"));
            assert!(html.contains("class=\"test skip\""));
        }

        #[test]
        fn test_render_json() {
            let reporter = sample();
            let json: serde_json::Value = serde_json::from_str(&reporter.render_json().unwrap()).unwrap();
            assert_eq!(json["summary"]["failed"], 1);
            assert_eq!(json["results"][0]["status"], "passed");
            assert_eq!(json["results"][1]["screenshot_path"], "s.png");
            assert_eq!(json["run_id"], reporter.run_id().to_string());
        }

        #[test]
        fn test_render_junit() {
            let xml = sample().render_junit();
            assert!(xml.contains(r#"tests="3" failures="1" skipped="1""#));
            assert!(xml.contains("<failure message=\"1920 &gt; 750\">"));
            assert!(xml.contains("<skipped message=\"CAPTCHA\"/>"));
        }

        #[test]
        fn test_write_all() {
            let dir = tempfile::tempdir().unwrap();
            let written = sample().write_all(&dir.path().join("results")).unwrap();
            assert_eq!(written.len(), 3);
            for path in written {
                assert!(path.exists());
            }
        }
    }

    #[test]
    fn test_escape_special_chars() {
        assert_eq!(escape_html("<a & 'b'>"), "&lt;a &amp; &apos;b&apos;&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
