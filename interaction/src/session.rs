//! Device session boundary.
//!
//! The interaction layer never talks to a device directly; it consumes a
//! [`Session`] supplied by the caller. [`crate::AppiumSession`] is the real
//! implementation, [`crate::testing::ScriptedSession`] the test double.

use crate::error::DriverError;
use std::fmt;

/// Ways of resolving a UI element in the accessibility tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Android resource id, e.g. `com.monefy.app.lite:id/expense_button`
    Id(String),
    /// Content description
    AccessibilityId(String),
    XPath(String),
    /// Raw UiAutomator selector expression
    UiAutomator(String),
    /// First element whose visible text contains the value (case-sensitive)
    TextContains(String),
}

impl Selector {
    pub fn id(value: impl Into<String>) -> Self {
        Self::Id(value.into())
    }

    pub fn accessibility_id(value: impl Into<String>) -> Self {
        Self::AccessibilityId(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self::XPath(value.into())
    }

    pub fn ui_automator(value: impl Into<String>) -> Self {
        Self::UiAutomator(value.into())
    }

    pub fn text_contains(value: impl Into<String>) -> Self {
        Self::TextContains(value.into())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(value) => write!(f, "id={value}"),
            Self::AccessibilityId(value) => write!(f, "accessibility id={value}"),
            Self::XPath(value) => write!(f, "xpath={value}"),
            Self::UiAutomator(value) => write!(f, "uiautomator={value}"),
            Self::TextContains(value) => write!(f, "text~={value}"),
        }
    }
}

/// Opaque element handle owned by the driver session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element(String);

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operations a device automation driver exposes to the interaction layer
pub trait Session {
    /// Resolve the first element matching the selector
    fn find(&self, selector: &Selector) -> Result<Element, DriverError>;

    fn is_displayed(&self, element: &Element) -> Result<bool, DriverError>;

    fn is_enabled(&self, element: &Element) -> Result<bool, DriverError>;

    fn click(&self, element: &Element) -> Result<(), DriverError>;

    fn clear(&self, element: &Element) -> Result<(), DriverError>;

    fn send_keys(&self, element: &Element, text: &str) -> Result<(), DriverError>;

    fn text(&self, element: &Element) -> Result<String, DriverError>;

    /// Press the device back button
    fn back(&self) -> Result<(), DriverError>;

    /// Capture the current screen as PNG bytes
    fn screenshot(&self) -> Result<Vec<u8>, DriverError>;

    /// End the session. Further calls fail with `InvalidSession`.
    fn quit(&self) -> Result<(), DriverError>;
}
