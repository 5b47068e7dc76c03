//! Test doubles for the session and clock boundaries.

use crate::clock::Clock;
use crate::error::DriverError;
use crate::session::{Element, Selector, Session};
use std::cell::{Cell, RefCell};
use std::time::Duration;

/// Clock that advances only when slept on, recording every pause
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
    sleeps: RefCell<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }

    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.advance(duration);
    }
}

/// Scripted behavior of one element
#[derive(Debug, Clone)]
pub struct ElementScript {
    id: String,
    text: String,
    hidden_for: u32,
    missing_for: u32,
    stale_for: u32,
    blocked_for: u32,
    disabled: bool,
}

impl ElementScript {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            hidden_for: 0,
            missing_for: 0,
            stale_for: 0,
            blocked_for: 0,
            disabled: false,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Report not displayed for the first `polls` visibility checks
    pub fn hidden_for(mut self, polls: u32) -> Self {
        self.hidden_for = polls;
        self
    }

    /// Fail the first `lookups` finds with `NotFound`
    pub fn missing_for(mut self, lookups: u32) -> Self {
        self.missing_for = lookups;
        self
    }

    /// Fail the first `touches` element calls with `StaleReference`
    pub fn stale_for(mut self, touches: u32) -> Self {
        self.stale_for = touches;
        self
    }

    /// Fail the first `clicks` with `NotInteractable`
    pub fn blocked_for(mut self, clicks: u32) -> Self {
        self.blocked_for = clicks;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// In-memory session driven by [`ElementScript`]s.
///
/// Elements are kept in registration order, which stands in for the
/// accessibility tree traversal order of a real device.
#[derive(Debug)]
pub struct ScriptedSession {
    elements: RefCell<Vec<(Selector, ElementScript)>>,
    calls: RefCell<Vec<String>>,
    screenshot: Option<Vec<u8>>,
    back_fails: bool,
    valid: Cell<bool>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self {
            elements: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            screenshot: Some(b"\x89PNG\r\n\x1a\n".to_vec()),
            back_fails: false,
            valid: Cell::new(true),
        }
    }

    pub fn with_element(self, selector: Selector, script: ElementScript) -> Self {
        self.elements.borrow_mut().push((selector, script));
        self
    }

    pub fn with_screenshot(mut self, png: Vec<u8>) -> Self {
        self.screenshot = Some(png);
        self
    }

    pub fn with_failing_screenshots(mut self) -> Self {
        self.screenshot = None;
        self
    }

    pub fn with_failing_back(mut self) -> Self {
        self.back_fails = true;
        self
    }

    /// Every call made so far, e.g. `find id=...`, `click el-1`
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of calls starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    /// Current text of a scripted element
    pub fn element_text(&self, id: &str) -> Option<String> {
        self.elements
            .borrow()
            .iter()
            .find(|(_, script)| script.id == id)
            .map(|(_, script)| script.text.clone())
    }

    fn record(&self, call: String) -> Result<(), DriverError> {
        self.calls.borrow_mut().push(call);
        if self.valid.get() {
            Ok(())
        } else {
            Err(DriverError::InvalidSession("session was quit".to_string()))
        }
    }

    fn touch<T>(
        &self,
        element: &Element,
        action: impl FnOnce(&mut ElementScript) -> Result<T, DriverError>,
    ) -> Result<T, DriverError> {
        let mut elements = self.elements.borrow_mut();
        let stale = || DriverError::StaleReference {
            element: element.id().to_string(),
        };
        let script = elements
            .iter_mut()
            .map(|(_, script)| script)
            .find(|script| script.id == element.id())
            .ok_or_else(stale)?;

        if script.stale_for > 0 {
            script.stale_for -= 1;
            return Err(stale());
        }
        action(script)
    }
}

impl Default for ScriptedSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Session for ScriptedSession {
    fn find(&self, selector: &Selector) -> Result<Element, DriverError> {
        self.record(format!("find {selector}"))?;
        let mut elements = self.elements.borrow_mut();

        let matched = match selector {
            Selector::TextContains(text) => elements
                .iter_mut()
                .map(|(_, script)| script)
                .find(|script| script.missing_for == 0 && script.text.contains(text.as_str())),
            other => elements
                .iter_mut()
                .find(|(registered, _)| registered == other)
                .map(|(_, script)| script),
        };

        match matched {
            Some(script) if script.missing_for > 0 => {
                script.missing_for -= 1;
                Err(DriverError::NotFound {
                    selector: selector.to_string(),
                })
            }
            Some(script) => Ok(Element::new(script.id.clone())),
            None => Err(DriverError::NotFound {
                selector: selector.to_string(),
            }),
        }
    }

    fn is_displayed(&self, element: &Element) -> Result<bool, DriverError> {
        self.record(format!("displayed {element}"))?;
        self.touch(element, |script| {
            if script.hidden_for > 0 {
                script.hidden_for -= 1;
                Ok(false)
            } else {
                Ok(true)
            }
        })
    }

    fn is_enabled(&self, element: &Element) -> Result<bool, DriverError> {
        self.record(format!("enabled {element}"))?;
        self.touch(element, |script| Ok(!script.disabled))
    }

    fn click(&self, element: &Element) -> Result<(), DriverError> {
        self.record(format!("click {element}"))?;
        self.touch(element, |script| {
            if script.blocked_for > 0 {
                script.blocked_for -= 1;
                return Err(DriverError::NotInteractable {
                    element: script.id.clone(),
                    message: "another element would receive the click".to_string(),
                });
            }
            Ok(())
        })
    }

    fn clear(&self, element: &Element) -> Result<(), DriverError> {
        self.record(format!("clear {element}"))?;
        self.touch(element, |script| {
            script.text.clear();
            Ok(())
        })
    }

    fn send_keys(&self, element: &Element, text: &str) -> Result<(), DriverError> {
        self.record(format!("send_keys {element} {text}"))?;
        self.touch(element, |script| {
            script.text.push_str(text);
            Ok(())
        })
    }

    fn text(&self, element: &Element) -> Result<String, DriverError> {
        self.record(format!("text {element}"))?;
        self.touch(element, |script| Ok(script.text.clone()))
    }

    fn back(&self) -> Result<(), DriverError> {
        self.record("back".to_string())?;
        if self.back_fails {
            return Err(DriverError::protocol("unknown error", "back is not available"));
        }
        Ok(())
    }

    fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        self.record("screenshot".to_string())?;
        self.screenshot
            .clone()
            .ok_or_else(|| DriverError::protocol("unable to capture screen", "secure surface"))
    }

    fn quit(&self) -> Result<(), DriverError> {
        self.record("quit".to_string())?;
        self.valid.set(false);
        Ok(())
    }
}
