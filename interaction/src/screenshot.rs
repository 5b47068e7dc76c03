use crate::session::Session;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Directory screenshots land in unless configured otherwise
pub const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Best-effort screenshot capture.
///
/// Failures are logged and reported as `None`; capturing a screenshot never
/// produces an error that could mask the failure being diagnosed.
#[derive(Debug, Clone)]
pub struct ScreenshotRecorder {
    dir: PathBuf,
}

impl ScreenshotRecorder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `{label}_{yyyyMMdd_HHmmss}.png`
    pub fn file_name(label: &str, taken_at: DateTime<Local>) -> String {
        let label: String = label
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!("{}_{}.png", label, taken_at.format(TIMESTAMP_FORMAT))
    }

    /// Capture the current screen under `label`
    pub fn capture(&self, session: &dyn Session, label: &str) -> Option<PathBuf> {
        match self.try_capture(session, label) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "screenshot saved");
                Some(path)
            }
            Err(error) => {
                tracing::error!(label, error = %error, "failed to take screenshot");
                None
            }
        }
    }

    fn try_capture(
        &self,
        session: &dyn Session,
        label: &str,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let png = session.screenshot()?;
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(Self::file_name(label, Local::now()));
        std::fs::write(&path, png)?;
        Ok(path)
    }
}

impl Default for ScreenshotRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_SCREENSHOT_DIR)
    }
}
