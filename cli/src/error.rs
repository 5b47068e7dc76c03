use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(#[from] api_client::ApiError),

    #[error("Interaction error: {0}")]
    Interaction(#[from] interaction::InteractionError),

    #[error("Device config error: {0}")]
    DeviceConfig(#[from] interaction::ConfigError),

    #[error("Device session error: {0}")]
    Driver(#[from] interaction::DriverError),

    #[error("Screenshot of '{0}' could not be saved")]
    ScreenshotFailed(String),

    #[error("{0}")]
    Other(String),

    #[error("{0}: {1}")]
    WithContext(String, Box<CliError>),
}

impl CliError {
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Io(err) => format!("I/O operation failed: {err}"),
            Self::Api(api_client::ApiError::ConfigNotFound { path })
            | Self::DeviceConfig(interaction::ConfigError::NotFound { path }) => {
                config_hint(path)
            }
            Self::Api(err) if err.is_transport() => {
                format!("Could not reach the API: {err}")
            }
            Self::Api(err) => err.to_string(),
            Self::Interaction(err) => format!("Device interaction failed: {err}"),
            Self::DeviceConfig(err) => format!("Invalid device configuration: {err}"),
            Self::Driver(err) => format!("Device session failed: {err}"),
            Self::ScreenshotFailed(label) => {
                format!("Screenshot '{label}' could not be saved, see the log for the cause")
            }
            Self::Other(msg) => msg.clone(),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}

fn config_hint(path: &Path) -> String {
    format!(
        "Configuration file not found: {} (pass --config to use another file)",
        path.display()
    )
}

pub type Result<T> = std::result::Result<T, CliError>;

pub trait ResultExt<T, E> {
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: Into<CliError>,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| {
            let cli_err: CliError = err.into();
            cli_err.with_context(context())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_prepended() {
        let err = CliError::Other("boom".to_string()).with_context("Probing pet 7");
        assert_eq!(err.user_message(), "Probing pet 7: boom");
    }

    #[test]
    fn test_missing_config_hint() {
        let err: CliError = api_client::ApiError::ConfigNotFound {
            path: std::path::PathBuf::from("fieldcheck.toml"),
        }
        .into();
        assert!(err.user_message().contains("--config"));
    }
}
