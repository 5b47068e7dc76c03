use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for interaction operations
pub type Result<T> = std::result::Result<T, InteractionError>;

/// Failures reported by a device automation session
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("no element matches {selector}")]
    NotFound { selector: String },

    #[error("stale element reference: {element}")]
    StaleReference { element: String },

    #[error("element {element} is not interactable: {message}")]
    NotInteractable { element: String, message: String },

    #[error("session is no longer valid: {0}")]
    InvalidSession(String),

    #[error("driver transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("driver returned '{error}': {message}")]
    Protocol { error: String, message: String },

    #[error("screenshot payload could not be decoded: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl DriverError {
    /// Whether the failure may clear up on its own (element still rendering,
    /// detached and re-attached, covered by an animation)
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::StaleReference { .. } | Self::NotInteractable { .. }
        )
    }

    /// Create a new protocol error
    pub fn protocol<S: Into<String>>(error: S, message: S) -> Self {
        Self::Protocol {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by the interaction layer
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("'{condition}' not satisfied within {timeout:?}")]
    PreconditionTimeout { condition: String, timeout: Duration },

    #[error("reference to '{target}' went stale")]
    StaleReference { target: String },

    #[error("{action} failed after {attempts} attempts: {source}")]
    RetryExhausted {
        action: String,
        attempts: u32,
        source: Box<InteractionError>,
    },

    #[error("none of {attempted} strategies located an element (last: {last_cause})")]
    LocatorExhausted { attempted: usize, last_cause: String },

    #[error("invalid retry policy: {message}")]
    InvalidPolicy { message: String },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl InteractionError {
    /// Map a driver failure observed while acting on `target`
    pub fn from_driver<S: Into<String>>(target: S, error: DriverError) -> Self {
        match error {
            DriverError::StaleReference { .. } => Self::StaleReference {
                target: target.into(),
            },
            other => Self::Driver(other),
        }
    }

    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::PreconditionTimeout { .. }
            | Self::StaleReference { .. }
            | Self::LocatorExhausted { .. } => true,
            Self::Driver(error) => error.is_transient(),
            Self::RetryExhausted { .. } | Self::InvalidPolicy { .. } => false,
        }
    }

    /// The innermost cause, following retry exhaustion
    pub fn root_cause(&self) -> &InteractionError {
        match self {
            Self::RetryExhausted { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Errors loading the device configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    /// Create a new invalid configuration error
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}
