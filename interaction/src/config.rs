use crate::error::ConfigError;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

/// Device and app under test, read from the `[device]` table
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    /// Appium server endpoint, e.g. `http://127.0.0.1:4723`
    pub server_url: String,
    pub device_name: String,
    pub udid: Option<String>,
    #[serde(default = "default_platform_name")]
    pub platform_name: String,
    pub platform_version: Option<String>,
    pub app_package: String,
    pub app_activity: String,
    #[serde(default = "default_automation_name")]
    pub automation_name: String,
    /// Implicit element wait applied to the session, in seconds
    #[serde(default = "default_implicit_wait")]
    pub implicit_wait_seconds: u64,
}

fn default_platform_name() -> String {
    "Android".to_string()
}

fn default_automation_name() -> String {
    "UiAutomator2".to_string()
}

fn default_implicit_wait() -> u64 {
    10
}

#[derive(Deserialize)]
struct Document {
    device: DeviceConfig,
}

impl DeviceConfig {
    /// Parse the `[device]` table out of a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let document: Document = toml::from_str(content)?;
        document.device.validate()?;
        Ok(document.device)
    }

    /// Load and validate the `[device]` table of a config file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        if !path_ref.exists() {
            return Err(ConfigError::NotFound {
                path: path_ref.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path_ref)?;
        Self::from_toml_str(&content)
    }

    /// Reject values that would only fail later, at session creation
    pub fn validate(&self) -> Result<(), ConfigError> {
        reqwest::Url::parse(&self.server_url).map_err(|e| {
            ConfigError::invalid(format!("server_url '{}' is not a URL: {}", self.server_url, e))
        })?;

        for (key, value) in [
            ("device_name", &self.device_name),
            ("app_package", &self.app_package),
            ("app_activity", &self.app_activity),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }

    /// W3C capabilities for a UiAutomator2 session
    pub fn capabilities(&self) -> Value {
        let mut always_match = json!({
            "platformName": self.platform_name,
            "appium:deviceName": self.device_name,
            "appium:appPackage": self.app_package,
            "appium:appActivity": self.app_activity,
            "appium:automationName": self.automation_name,
            "appium:noReset": false,
            "appium:autoGrantPermissions": true,
            "appium:ignoreHiddenApiPolicyError": true,
            "appium:newCommandTimeout": 60,
            "appium:adbExecTimeout": 60000,
        });

        if let Some(map) = always_match.as_object_mut() {
            if let Some(udid) = &self.udid {
                map.insert("appium:udid".to_string(), json!(udid));
            }
            if let Some(version) = &self.platform_version {
                map.insert("appium:platformVersion".to_string(), json!(version));
            }
        }

        json!({ "capabilities": { "alwaysMatch": always_match } })
    }
}
