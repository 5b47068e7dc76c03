//! Resilient element interactions.
//!
//! Every interaction resolves its target, waits for the operation's
//! precondition and then acts, all inside a bounded retry loop. Exhaustion is
//! the only failure a caller sees for flaky elements; the attempts leading up
//! to it are kept in the [`DiagnosticLog`].

use crate::clock::Clock;
use crate::diagnostics::DiagnosticLog;
use crate::error::{DriverError, InteractionError, Result};
use crate::locator::{find_by_text, Target};
use crate::policy::{RetryPolicy, WaitPolicy};
use crate::retry::{run_with_retry, Phase, PhaseTracker};
use crate::screenshot::ScreenshotRecorder;
use crate::session::{Element, Selector, Session};
use crate::wait::wait_until;
use std::path::PathBuf;
use std::time::Duration;

/// UI operation performed on a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Click,
    /// Clear the field, then type
    EnterText(String),
    ReadText,
}

impl Interaction {
    /// Operation label used in diagnostics and screenshot names
    pub fn label(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::EnterText(_) => "enter_text",
            Self::ReadText => "read_text",
        }
    }

    pub fn precondition(&self) -> Precondition {
        match self {
            Self::Click => Precondition::Clickable,
            Self::EnterText(_) | Self::ReadText => Precondition::Visible,
        }
    }
}

/// Result of a successful interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Text(String),
}

/// UI state an element must reach before it is acted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    Visible,
    /// Displayed and enabled
    Clickable,
}

impl Precondition {
    pub fn describe(&self, target: &str) -> String {
        match self {
            Self::Visible => format!("{target} visible"),
            Self::Clickable => format!("{target} clickable"),
        }
    }

    fn holds(
        &self,
        session: &dyn Session,
        element: &Element,
    ) -> std::result::Result<bool, DriverError> {
        match self {
            Self::Visible => session.is_displayed(element),
            Self::Clickable => Ok(session.is_displayed(element)? && session.is_enabled(element)?),
        }
    }
}

/// Retry-driven interaction layer over an injected session
pub struct Interactor<'s> {
    session: &'s dyn Session,
    clock: &'s dyn Clock,
    retry: RetryPolicy,
    precondition_wait: WaitPolicy,
    screenshots: Option<ScreenshotRecorder>,
    log: DiagnosticLog,
    phase: PhaseTracker,
}

impl<'s> Interactor<'s> {
    /// Interactor with the default retry policy, precondition wait and
    /// screenshot directory
    pub fn new(session: &'s dyn Session, clock: &'s dyn Clock) -> Self {
        Self {
            session,
            clock,
            retry: RetryPolicy::default(),
            precondition_wait: WaitPolicy::PRECONDITION,
            screenshots: Some(ScreenshotRecorder::default()),
            log: DiagnosticLog::new(),
            phase: PhaseTracker::new(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    pub fn with_precondition_wait(mut self, wait: WaitPolicy) -> Self {
        self.precondition_wait = wait;
        self
    }

    pub fn with_screenshots(mut self, recorder: ScreenshotRecorder) -> Self {
        self.screenshots = Some(recorder);
        self
    }

    pub fn without_screenshots(mut self) -> Self {
        self.screenshots = None;
        self
    }

    pub fn session(&self) -> &dyn Session {
        self.session
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.log
    }

    /// Phase the most recent interaction ended in
    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Perform `op` on `target` under the retry policy.
    ///
    /// On exhaustion a screenshot labelled `{operation}_{target}` is attempted
    /// before the error is returned.
    pub fn interact(&self, op: &Interaction, target: &Target) -> Result<Outcome> {
        let label = format!("{}_{}", op.label(), target.name());
        self.phase.set(Phase::Idle);

        let result = run_with_retry(
            &self.retry,
            self.clock,
            &label,
            &self.log,
            &self.phase,
            |_| self.attempt(op, target),
        );

        if matches!(result, Err(InteractionError::RetryExhausted { .. })) {
            self.take_screenshot(&label);
        }
        result
    }

    pub fn click(&self, target: &Target) -> Result<()> {
        self.interact(&Interaction::Click, target).map(|_| ())
    }

    pub fn enter_text(&self, target: &Target, text: &str) -> Result<()> {
        self.interact(&Interaction::EnterText(text.to_string()), target)
            .map(|_| ())
    }

    pub fn read_text(&self, target: &Target) -> Result<String> {
        match self.interact(&Interaction::ReadText, target)? {
            Outcome::Text(text) => Ok(text),
            Outcome::Done => Ok(String::new()),
        }
    }

    /// Whether the target is on screen right now; lookup failures count as
    /// not displayed
    pub fn is_displayed(&self, target: &Target) -> bool {
        target
            .resolve(self.session)
            .and_then(|element| Ok(self.session.is_displayed(&element)?))
            .unwrap_or(false)
    }

    /// Poll for an element to appear, ignoring not-found and stale lookups.
    /// Returns `None` when the wait times out.
    pub fn wait_for_element(&self, selector: &Selector, wait: WaitPolicy) -> Option<Element> {
        let result = wait_until(self.clock, &wait, &format!("{selector} present"), || {
            match self.session.find(selector) {
                Ok(element) => Ok(Some(element)),
                Err(error) if error.is_transient() => Ok(None),
                Err(error) => Err(error),
            }
        });

        match result {
            Ok(element) => Some(element),
            Err(error) => {
                tracing::warn!(%selector, error = %error, "element not found after waiting");
                None
            }
        }
    }

    /// Poll until the target is resolvable and displayed
    pub fn wait_for_displayed(&self, target: &Target, timeout: Duration) -> bool {
        let wait = WaitPolicy::FLUENT.with_timeout(timeout);
        let condition = Precondition::Visible.describe(target.name());
        wait_until(self.clock, &wait, &condition, || {
            let element = match target.resolve(self.session) {
                Ok(element) => element,
                Err(InteractionError::Driver(error)) if !error.is_transient() => {
                    return Err(error);
                }
                Err(_) => return Ok(None),
            };
            match self.session.is_displayed(&element) {
                Ok(true) => Ok(Some(())),
                Ok(false) => Ok(None),
                Err(error) if error.is_transient() => Ok(None),
                Err(error) => Err(error),
            }
        })
        .is_ok()
    }

    /// Find an element by visible text and click it without escalating.
    ///
    /// Returns `false` if no element carries the text or every click attempt
    /// fails.
    pub fn click_by_text(&self, text: &str) -> bool {
        let element = match find_by_text(self.session, text) {
            Ok(element) => element,
            Err(error) => {
                tracing::warn!(text, error = %error, "element with text not found");
                return false;
            }
        };

        let target = Target::element(format!("text_{text}"), element);
        match self.interact(&Interaction::Click, &target) {
            Ok(_) => true,
            Err(error) => {
                tracing::error!(text, error = %error, "all click attempts failed");
                false
            }
        }
    }

    /// Press the device back button, then pause for the screen to settle
    pub fn navigate_back(&self, pause: Duration) -> bool {
        match self.session.back() {
            Ok(()) => {
                self.clock.sleep(pause);
                true
            }
            Err(error) => {
                tracing::warn!(error = %error, "navigate back failed");
                false
            }
        }
    }

    /// Best-effort screenshot under `label`
    pub fn take_screenshot(&self, label: &str) -> Option<PathBuf> {
        self.screenshots
            .as_ref()
            .and_then(|recorder| recorder.capture(self.session, label))
    }

    fn attempt(&self, op: &Interaction, target: &Target) -> Result<Outcome> {
        let element = target.resolve(self.session)?;
        let precondition = op.precondition();
        let condition = precondition.describe(target.name());

        wait_until(self.clock, &self.precondition_wait, &condition, || {
            Ok(precondition.holds(self.session, &element)?.then_some(()))
        })
        .map_err(|error| match error {
            InteractionError::Driver(inner) => InteractionError::from_driver(target.name(), inner),
            other => other,
        })?;

        self.phase.set(Phase::Executing);
        self.execute(op, &element)
            .map_err(|error| InteractionError::from_driver(target.name(), error))
    }

    fn execute(
        &self,
        op: &Interaction,
        element: &Element,
    ) -> std::result::Result<Outcome, DriverError> {
        match op {
            Interaction::Click => {
                self.session.click(element)?;
                Ok(Outcome::Done)
            }
            Interaction::EnterText(text) => {
                self.session.clear(element)?;
                self.session.send_keys(element, text)?;
                Ok(Outcome::Done)
            }
            Interaction::ReadText => Ok(Outcome::Text(self.session.text(element)?)),
        }
    }
}

/// Page-object base: a named screen acting through an [`Interactor`]
pub struct Screen<'a> {
    name: String,
    interactor: &'a Interactor<'a>,
}

impl<'a> Screen<'a> {
    /// Default pause after pressing back
    pub const BACK_PAUSE: Duration = Duration::from_millis(1000);

    pub fn new(name: impl Into<String>, interactor: &'a Interactor<'a>) -> Self {
        Self {
            name: name.into(),
            interactor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interactor(&self) -> &Interactor<'a> {
        self.interactor
    }

    pub fn click(&self, target: &Target) -> Result<()> {
        self.interactor.click(target)
    }

    pub fn enter_text(&self, target: &Target, text: &str) -> Result<()> {
        self.interactor.enter_text(target, text)
    }

    pub fn read_text(&self, target: &Target) -> Result<String> {
        self.interactor.read_text(target)
    }

    pub fn is_displayed(&self, target: &Target) -> bool {
        self.interactor.is_displayed(target)
    }

    pub fn click_by_text(&self, text: &str) -> bool {
        self.interactor.click_by_text(text)
    }

    pub fn navigate_back(&self) -> bool {
        self.interactor.navigate_back(Self::BACK_PAUSE)
    }

    /// Screenshot labelled `{screen}_{action}`
    pub fn take_screenshot(&self, action: &str) -> Option<PathBuf> {
        self.interactor
            .take_screenshot(&format!("{}_{}", self.name, action))
    }
}
