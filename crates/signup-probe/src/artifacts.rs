//! On-disk artifacts: failure screenshots and report directories.

use crate::driver::Screenshot;
use crate::result::ProbeResult;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Owns the output directories of a run
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    screenshot_dir: PathBuf,
    report_dir: PathBuf,
}

impl ArtifactStore {
    /// Store writing into the given directories
    #[must_use]
    pub fn new(screenshot_dir: impl Into<PathBuf>, report_dir: impl Into<PathBuf>) -> Self {
        Self {
            screenshot_dir: screenshot_dir.into(),
            report_dir: report_dir.into(),
        }
    }

    /// Create both directories up front
    ///
    /// # Errors
    ///
    /// Returns error if a directory cannot be created.
    pub fn prepare(&self) -> ProbeResult<()> {
        std::fs::create_dir_all(&self.screenshot_dir)?;
        std::fs::create_dir_all(&self.report_dir)?;
        Ok(())
    }

    /// Screenshot directory
    #[must_use]
    pub fn screenshot_dir(&self) -> &Path {
        &self.screenshot_dir
    }

    /// Report directory
    #[must_use]
    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// `screenshot_<case>_<YYYYmmdd_HHMMSS>.png` under the screenshot directory
    #[must_use]
    pub fn screenshot_path(&self, case_name: &str, at: DateTime<Local>) -> PathBuf {
        self.screenshot_dir.join(format!(
            "screenshot_{}_{}.png",
            sanitize(case_name),
            at.format("%Y%m%d_%H%M%S")
        ))
    }

    /// Write a failure screenshot for `case_name`
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub fn save_screenshot(&self, case_name: &str, screenshot: &Screenshot) -> ProbeResult<PathBuf> {
        std::fs::create_dir_all(&self.screenshot_dir)?;
        let path = self.screenshot_path(case_name, Local::now());
        std::fs::write(&path, &screenshot.data)?;
        tracing::info!(path = %path.display(), "saved failure screenshot");
        Ok(path)
    }
}

/// Make a case name safe to use in a file name
fn sanitize(name: &str) -> String {
    name.replace("::", "_")
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}
