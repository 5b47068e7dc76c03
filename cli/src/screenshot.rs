use crate::error::{CliError, Result, ResultExt};
use crate::ui;
use interaction::{AppiumSession, DeviceConfig, Interactor, ScreenshotRecorder, SystemClock};
use std::path::Path;

pub fn execute(config_path: &str, label: &str, dir: &str) -> Result<()> {
    let config = DeviceConfig::load_from_file(Path::new(config_path))?;

    ui::info_message(&format!(
        "Opening session on {} for {}",
        config.device_name, config.app_package
    ));
    let session = AppiumSession::open(&config).with_context(|| "Opening device session")?;

    let clock = SystemClock::new();
    let saved = Interactor::new(&session, &clock)
        .with_screenshots(ScreenshotRecorder::new(dir))
        .take_screenshot(label);

    session.close().with_context(|| "Closing device session")?;

    match saved {
        Some(path) => {
            ui::success_message(&format!("Saved {}", path.display()));
            Ok(())
        }
        None => Err(CliError::ScreenshotFailed(label.to_string())),
    }
}
