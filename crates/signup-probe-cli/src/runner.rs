//! Suite execution for the `test` and `list` commands

use crate::commands::{DriverArg, FormatArg, ListArgs, MarkerArg, TestArgs};
use crate::config::{suite_config, CliConfig};
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use signup_probe::{
    catalog, CaseFilter, DriverFactory, Marker, Reporter, SignupCase, SimulatedFactory,
    SuiteConfig, SuiteRunner,
};
use std::path::PathBuf;

/// Finished run: the reporter and the report files written
#[derive(Debug)]
pub struct SuiteOutcome {
    /// Recorded results
    pub reporter: Reporter,
    /// Report files on disk
    pub written: Vec<PathBuf>,
}

impl SuiteOutcome {
    /// Error if any case failed
    ///
    /// # Errors
    ///
    /// [`CliError::TestsFailed`] when at least one case failed.
    pub fn ensure_passed(&self) -> CliResult<()> {
        let failed = self.reporter.failed_count();
        if failed == 0 {
            Ok(())
        } else {
            Err(CliError::TestsFailed {
                failed,
                total: self.reporter.total_count(),
            })
        }
    }

    /// What to print on stdout for `format`
    ///
    /// # Errors
    ///
    /// Returns error if the JSON report cannot be rendered.
    pub fn render(&self, format: FormatArg) -> CliResult<String> {
        Ok(match format {
            FormatArg::Text => {
                let mut text = self.reporter.summary();
                for path in &self.written {
                    text.push_str(&format!("\nreport: {}", path.display()));
                }
                for failure in self.reporter.failures() {
                    if let Some(ref shot) = failure.screenshot_path {
                        text.push_str(&format!("\nscreenshot: {}", shot.display()));
                    }
                }
                text
            }
            FormatArg::Json => self.reporter.render_json()?,
            FormatArg::Html => self.reporter.render_html(),
        })
    }
}

fn selection(markers: &[MarkerArg], keyword: Option<&str>) -> CaseFilter {
    let filter = CaseFilter::new().with_markers(markers.iter().copied().map(Marker::from));
    match keyword {
        Some(k) => filter.with_keyword(k),
        None => filter,
    }
}

/// Cases selected by the `list` arguments
#[must_use]
pub fn list_cases(args: &ListArgs) -> Vec<SignupCase> {
    selection(&args.markers, args.filter.as_deref()).apply(catalog())
}

/// Run the selected cases and write reports
///
/// # Errors
///
/// Returns error for bad configuration, an empty selection, a backend that
/// is not compiled in, or report I/O failures. Failed cases are not errors
/// here; see [`SuiteOutcome::ensure_passed`].
pub fn run_tests(config: &CliConfig, args: &TestArgs) -> CliResult<SuiteOutcome> {
    let suite = suite_config(SuiteConfig::from_env()?, args)?;
    let cases = selection(&args.markers, args.filter.as_deref()).apply(catalog());
    if cases.is_empty() {
        return Err(CliError::NothingSelected);
    }

    let quiet = config.verbosity.is_quiet() || args.format != FormatArg::Text;
    let mut progress = ProgressReporter::new(config.color.should_color(), quiet);
    if config.verbosity.is_verbose() {
        progress.info(&format!("testing {}", suite.signup_url()));
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match args.driver.unwrap_or(DriverArg::default_for_build()) {
        DriverArg::Simulated => {
            runtime.block_on(execute(SimulatedFactory::default(), suite, &cases, &mut progress))
        }
        #[cfg(feature = "browser")]
        DriverArg::Chromium => runtime.block_on(execute(
            signup_probe::ChromiumFactory,
            suite,
            &cases,
            &mut progress,
        )),
        #[cfg(not(feature = "browser"))]
        DriverArg::Chromium => Err(CliError::config(
            "chromium driver not compiled in; rebuild with --features browser or use --driver simulated",
        )),
    }
}

async fn execute<F: DriverFactory>(
    factory: F,
    suite: SuiteConfig,
    cases: &[SignupCase],
    progress: &mut ProgressReporter,
) -> CliResult<SuiteOutcome> {
    let mut runner = SuiteRunner::new(factory, suite);
    let reporter = runner.run(cases, progress).await?;
    let written = reporter
        .write_all(runner.artifacts().report_dir())
        .map_err(|e| CliError::report_generation(e.to_string()))?;
    tracing::info!(
        dir = %runner.artifacts().report_dir().display(),
        files = written.len(),
        "reports written"
    );
    Ok(SuiteOutcome { reporter, written })
}
