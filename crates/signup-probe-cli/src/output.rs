//! Output formatting and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use signup_probe::{ProbeError, Reporter, RunObserver, SignupCase, TestResultEntry, TestStatus};
use std::time::Duration;

/// Progress reporter for suite execution
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar for multiple cases
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet || !self.term.is_term() {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn line(&self, message: &str) {
        match self.progress_bar {
            Some(ref pb) => pb.println(message),
            None => {
                let _ = self.term.write_line(message);
            }
        }
    }

    fn prefixed(&self, symbol: &str, plain: &str, paint: fn(&str) -> String, message: &str) {
        let prefix = if self.use_color {
            paint(symbol)
        } else {
            plain.to_string()
        };
        self.line(&format!("{prefix} {message}"));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.prefixed("✓", "PASS", |s| style(s).green().bold().to_string(), message);
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // failures print even in quiet mode
        self.prefixed("✗", "FAIL", |s| style(s).red().bold().to_string(), message);
    }

    /// Print a skip message
    pub fn skipped(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.prefixed("-", "SKIP", |s| style(s).yellow().to_string(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.prefixed("⚠", "WARN", |s| style(s).yellow().bold().to_string(), message);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.prefixed("ℹ", "INFO", |s| style(s).blue().bold().to_string(), message);
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&styled);
    }

    /// Print suite summary
    pub fn summary(&self, passed: usize, failed: usize, skipped: usize, duration: Duration) {
        if self.quiet && failed == 0 {
            return;
        }

        let _ = self.term.write_line("");

        let total = passed + failed + skipped;
        let duration_secs = duration.as_secs_f64();

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let skipped_style = Style::new().yellow();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };

            let _ = self.term.write_line(&format!(
                "{} {} cases in {:.2}s ({} passed, {} failed, {} skipped)",
                status,
                total,
                duration_secs,
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
                skipped_style.apply_to(skipped)
            ));
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            let _ = self.term.write_line(&format!(
                "{status} {total} cases in {duration_secs:.2}s ({passed} passed, {failed} failed, {skipped} skipped)"
            ));
        }
    }
}

impl RunObserver for ProgressReporter {
    fn suite_started(&mut self, total: usize) {
        self.header("Signup Suite");
        self.start_progress(total as u64, "Starting...");
    }

    fn case_started(&mut self, case: &SignupCase) {
        self.set_message(&case.name);
    }

    fn case_retrying(&mut self, case: &SignupCase, attempt: u32, error: &ProbeError) {
        self.warning(&format!("{} attempt {attempt} failed, re-running: {error}", case.name));
    }

    fn case_finished(&mut self, entry: &TestResultEntry) {
        let label = if entry.attempts > 1 {
            format!("{} ({} attempts)", entry.name, entry.attempts)
        } else {
            entry.name.clone()
        };
        match entry.status {
            TestStatus::Passed => self.success(&label),
            TestStatus::Failed => self.failure(&format!(
                "{label}: {}",
                entry.error.as_deref().unwrap_or("unknown error")
            )),
            TestStatus::Skipped => self.skipped(&format!(
                "{label}: {}",
                entry.error.as_deref().unwrap_or("skipped")
            )),
        }
        self.increment(1);
    }

    fn suite_finished(&mut self, reporter: &Reporter) {
        self.finish();
        self.summary(
            reporter.passed_count(),
            reporter.failed_count(),
            reporter.skipped_count(),
            reporter.total_duration(),
        );
    }
}

/// Catalog as an aligned text table
#[must_use]
pub fn render_case_table(cases: &[SignupCase]) -> String {
    let width = cases.iter().map(|c| c.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for case in cases {
        let markers: Vec<&str> = case.markers.iter().map(|m| m.as_str()).collect();
        let mut line = format!("{:<width$}  [{}]", case.name, markers.join(", "));
        if case.reruns > 0 {
            line.push_str(&format!(" reruns={}", case.reruns));
        }
        if let Some(reason) = case.skip {
            line.push_str(&format!(" skipped: {reason}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push_str(&format!("{} cases\n", cases.len()));
    out
}

/// Catalog as JSON
#[must_use]
pub fn render_case_json(cases: &[SignupCase]) -> serde_json::Value {
    serde_json::Value::Array(
        cases
            .iter()
            .map(|c| {
                serde_json::json!({
                    "name": c.name,
                    "markers": c.markers,
                    "reruns": c.reruns,
                    "skip": c.skip,
                    "story": c.story,
                    "severity": c.severity,
                })
            })
            .collect(),
    )
}
