//! Appium session over the W3C WebDriver JSON protocol.
//!
//! Sessions are opened and closed explicitly; one that is dropped while still
//! open is quit on a best-effort basis.

use crate::config::DeviceConfig;
use crate::error::DriverError;
use crate::session::{Element, Selector, Session};
use base64::Engine;
use reqwest::blocking::Client;
use reqwest::Method;
use serde_json::{json, Value};
use std::cell::Cell;
use std::time::Duration;

/// W3C element reference key
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
/// Pre-W3C element reference key still returned by some drivers
const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Live session on an Appium server
#[derive(Debug)]
pub struct AppiumSession {
    client: Client,
    server_url: String,
    session_id: String,
    open: Cell<bool>,
}

impl AppiumSession {
    /// Create a session for the configured device and app
    pub fn open(config: &DeviceConfig) -> Result<Self, DriverError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        let server_url = config.server_url.trim_end_matches('/').to_string();

        let response = client
            .post(format!("{server_url}/session"))
            .json(&config.capabilities())
            .send()?;
        let value = unwrap_value(response)?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                DriverError::protocol("session not created", "response carried no sessionId")
            })?
            .to_string();

        let session = Self {
            client,
            server_url,
            session_id,
            open: Cell::new(true),
        };
        session.command(
            Method::POST,
            "/timeouts",
            Some(json!({ "implicit": config.implicit_wait_seconds * 1000 })),
        )?;

        tracing::info!(
            session_id = %session.session_id,
            device = %config.device_name,
            app = %config.app_package,
            "device session opened"
        );
        Ok(session)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// End the session
    pub fn close(self) -> Result<(), DriverError> {
        self.quit()
    }

    fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, DriverError> {
        if !self.open.get() {
            return Err(DriverError::InvalidSession(format!(
                "session {} was closed",
                self.session_id
            )));
        }

        let url = format!("{}/session/{}{}", self.server_url, self.session_id, path);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        unwrap_value(request.send()?)
    }

    fn element_command(
        &self,
        method: Method,
        element: &Element,
        action: &str,
        body: Option<Value>,
    ) -> Result<Value, DriverError> {
        self.command(method, &format!("/element/{}{}", element.id(), action), body)
    }
}

/// Map a selector onto a W3C `(using, value)` locator pair
pub fn locator_strategy(selector: &Selector) -> (&'static str, String) {
    match selector {
        Selector::Id(value) => ("id", value.clone()),
        Selector::AccessibilityId(value) => ("accessibility id", value.clone()),
        Selector::XPath(value) => ("xpath", value.clone()),
        Selector::UiAutomator(value) => ("-android uiautomator", value.clone()),
        Selector::TextContains(text) => (
            "-android uiautomator",
            format!(
                "new UiSelector().textContains(\"{}\")",
                text.replace('\\', "\\\\").replace('"', "\\\"")
            ),
        ),
    }
}

/// Extract `value` from a W3C response, turning error payloads into `DriverError`
fn unwrap_value(response: reqwest::blocking::Response) -> Result<Value, DriverError> {
    let status = response.status();
    let payload: Value = response.json()?;
    let value = payload.get("value").cloned().unwrap_or(Value::Null);

    if status.is_success() {
        Ok(value)
    } else {
        Err(classify_w3c_error(&value))
    }
}

/// Map a W3C error payload (`{"error": ..., "message": ...}`) onto a driver error kind
pub fn classify_w3c_error(value: &Value) -> DriverError {
    let error = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string();
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match error.as_str() {
        "no such element" => DriverError::NotFound { selector: message },
        "stale element reference" => DriverError::StaleReference { element: message },
        "element not interactable" | "element click intercepted" | "invalid element state" => {
            DriverError::NotInteractable {
                element: String::new(),
                message,
            }
        }
        "invalid session id" | "session not created" => DriverError::InvalidSession(message),
        _ => DriverError::Protocol { error, message },
    }
}

fn element_from(value: &Value) -> Option<Element> {
    value
        .get(ELEMENT_KEY)
        .or_else(|| value.get(LEGACY_ELEMENT_KEY))
        .and_then(Value::as_str)
        .map(Element::new)
}

impl Session for AppiumSession {
    fn find(&self, selector: &Selector) -> Result<Element, DriverError> {
        let (using, value) = locator_strategy(selector);
        let found = self
            .command(
                Method::POST,
                "/element",
                Some(json!({ "using": using, "value": value })),
            )
            .map_err(|error| match error {
                DriverError::NotFound { .. } => DriverError::NotFound {
                    selector: selector.to_string(),
                },
                other => other,
            })?;

        element_from(&found).ok_or_else(|| {
            DriverError::protocol("unknown error", "element reference missing from response")
        })
    }

    fn is_displayed(&self, element: &Element) -> Result<bool, DriverError> {
        let value = self.element_command(Method::GET, element, "/displayed", None)?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn is_enabled(&self, element: &Element) -> Result<bool, DriverError> {
        let value = self.element_command(Method::GET, element, "/enabled", None)?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn click(&self, element: &Element) -> Result<(), DriverError> {
        self.element_command(Method::POST, element, "/click", Some(json!({})))
            .map_err(|error| with_element(error, element))?;
        Ok(())
    }

    fn clear(&self, element: &Element) -> Result<(), DriverError> {
        self.element_command(Method::POST, element, "/clear", Some(json!({})))
            .map_err(|error| with_element(error, element))?;
        Ok(())
    }

    fn send_keys(&self, element: &Element, text: &str) -> Result<(), DriverError> {
        self.element_command(Method::POST, element, "/value", Some(json!({ "text": text })))
            .map_err(|error| with_element(error, element))?;
        Ok(())
    }

    fn text(&self, element: &Element) -> Result<String, DriverError> {
        let value = self.element_command(Method::GET, element, "/text", None)?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn back(&self) -> Result<(), DriverError> {
        self.command(Method::POST, "/back", Some(json!({})))?;
        Ok(())
    }

    fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        let value = self.command(Method::GET, "/screenshot", None)?;
        let encoded = value.as_str().ok_or_else(|| {
            DriverError::protocol("unknown error", "screenshot payload is not a string")
        })?;
        Ok(base64::engine::general_purpose::STANDARD.decode(encoded)?)
    }

    fn quit(&self) -> Result<(), DriverError> {
        if !self.open.get() {
            return Ok(());
        }
        let url = format!("{}/session/{}", self.server_url, self.session_id);
        self.open.set(false);
        unwrap_value(self.client.delete(url).send()?)?;
        tracing::info!(session_id = %self.session_id, "device session closed");
        Ok(())
    }
}

impl Drop for AppiumSession {
    fn drop(&mut self) {
        if self.open.get() {
            if let Err(error) = self.quit() {
                tracing::warn!(
                    session_id = %self.session_id,
                    error = %error,
                    "failed to quit session on drop"
                );
            }
        }
    }
}

fn with_element(error: DriverError, element: &Element) -> DriverError {
    match error {
        DriverError::NotInteractable { message, .. } => DriverError::NotInteractable {
            element: element.id().to_string(),
            message,
        },
        DriverError::StaleReference { .. } => DriverError::StaleReference {
            element: element.id().to_string(),
        },
        other => other,
    }
}
