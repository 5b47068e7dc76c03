use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Service under test, read from the `[api]` table
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base address every request path is appended to
    pub base_uri: String,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Sent as the `api_key` header on authenticated requests
    pub api_key: Option<String>,
    /// Image uploaded when a caller's file cannot be read
    pub sample_image: Option<PathBuf>,
}

fn default_timeout_ms() -> u64 {
    5000
}

#[derive(Deserialize)]
struct Document {
    api: ApiConfig,
}

impl ApiConfig {
    /// Config pointing at `base_uri` with every other setting defaulted
    pub fn new<S: Into<String>>(base_uri: S) -> Self {
        Self {
            base_uri: base_uri.into(),
            timeout_ms: default_timeout_ms(),
            api_key: None,
            sample_image: None,
        }
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_sample_image<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.sample_image = Some(path.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parse the `[api]` table out of a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: Document = toml::from_str(content)?;
        document.api.validate()?;
        Ok(document.api)
    }

    /// Load configuration with enhanced error context
    pub fn load_with_validation<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(ApiError::ConfigNotFound {
                path: path_ref.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path_ref)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ApiError::ConfigParse(inner) => ApiError::invalid_config(format!(
                "Failed to parse TOML in {}: {}",
                path_ref.display(),
                inner
            )),
            other => other,
        })
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_uri).map_err(|e| {
            ApiError::invalid_config(format!("base_uri '{}' is not a URL: {}", self.base_uri, e))
        })?;

        if self.timeout_ms == 0 {
            return Err(ApiError::invalid_config("timeout_ms must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_applied() {
        let config = ApiConfig::from_toml_str(
            r#"
[api]
base_uri = "https://petstore.swagger.io/v2"
"#,
        )
        .unwrap();

        assert_eq!(config.timeout_ms, 5000);
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_api_version_key_is_ignored() {
        let config = ApiConfig::from_toml_str(
            "[api]\nbase_uri = \"http://localhost/v2\"\napi_version = \"v2\"\n",
        )
        .unwrap();
        assert_eq!(config.base_uri, "http://localhost/v2");
    }

    #[test]
    fn test_missing_base_uri_is_fatal() {
        let result = ApiConfig::from_toml_str("[api]\ntimeout_ms = 100\n");
        assert!(matches!(result, Err(ApiError::ConfigParse(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = ApiConfig::from_toml_str(
            "[api]\nbase_uri = \"http://localhost\"\ntimeout_ms = 0\n",
        );
        assert!(matches!(result, Err(ApiError::InvalidConfig { .. })));
    }

    #[test]
    fn test_load_with_validation() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fieldcheck.toml");

        assert!(matches!(
            ApiConfig::load_with_validation(&path),
            Err(ApiError::ConfigNotFound { .. })
        ));

        fs::write(
            &path,
            r#"
[device]
server_url = "http://127.0.0.1:4723"

[api]
base_uri = "http://localhost:8080/v2"
api_key = "special-key"
sample_image = "fixtures/sample.jpg"
"#,
        )
        .unwrap();

        let config = ApiConfig::load_with_validation(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("special-key"));
        assert_eq!(config.sample_image, Some(PathBuf::from("fixtures/sample.jpg")));
    }

    #[test]
    fn test_malformed_file_names_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.toml");
        fs::write(&path, "[api\nbase_uri = ").unwrap();

        let error = ApiConfig::load_with_validation(&path).unwrap_err();
        assert!(matches!(error, ApiError::InvalidConfig { .. }));
        assert!(error.to_string().contains("broken.toml"));
    }
}
