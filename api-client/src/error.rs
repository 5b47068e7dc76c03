use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for api-client operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors raised while building, sending or decoding API requests.
///
/// Non-2xx responses are not errors here; they come back as responses and are
/// classified separately.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("HTTP transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Response body is not the expected JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },
}

impl ApiError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new invalid header error
    pub fn invalid_header<S: Into<String>>(name: S, message: S) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Whether the request never produced a response
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ApiError::invalid_config("base_uri must not be empty");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: base_uri must not be empty"
        );

        let error = ApiError::ConfigNotFound {
            path: PathBuf::from("fieldcheck.toml"),
        };
        assert!(error.to_string().contains("fieldcheck.toml"));
        assert!(!error.is_transport());
    }
}
