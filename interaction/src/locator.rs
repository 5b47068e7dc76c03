//! Locator fallback.
//!
//! Identifiers drift between app builds, so a target may carry several ways
//! of finding the same element. [`try_in_order`] walks them and keeps the
//! first one that resolves.

use crate::error::{DriverError, InteractionError, Result};
use crate::session::{Element, Selector, Session};

/// One way of resolving something, tried lazily
pub type Strategy<'a, T> = Box<dyn FnOnce() -> std::result::Result<T, DriverError> + 'a>;

/// Try each strategy in order and return the first success.
///
/// Strategies after the first success are never invoked. A fatal driver
/// error stops the walk and is returned as is. If every strategy misses, the
/// error reports how many were tried and the last failure.
pub fn try_in_order<'a, T, I>(strategies: I) -> Result<T>
where
    I: IntoIterator<Item = Strategy<'a, T>>,
{
    let mut attempted = 0;
    let mut last_cause = String::from("no strategies given");

    for strategy in strategies {
        attempted += 1;
        match strategy() {
            Ok(value) => return Ok(value),
            Err(error) if !error.is_transient() => {
                tracing::debug!(strategy = attempted, error = %error, "locator strategy aborted");
                return Err(InteractionError::Driver(error));
            }
            Err(error) => {
                tracing::debug!(strategy = attempted, error = %error, "locator strategy failed");
                last_cause = error.to_string();
            }
        }
    }

    Err(InteractionError::LocatorExhausted {
        attempted,
        last_cause,
    })
}

/// Resolve the first selector that matches an element
pub fn locate_any(session: &dyn Session, selectors: &[Selector]) -> Result<Element> {
    let strategies = selectors.iter().map(|selector| {
        let strategy: Strategy<'_, Element> = Box::new(move || session.find(selector));
        strategy
    });
    try_in_order(strategies)
}

/// First element whose visible text contains `text`.
///
/// Matching is case-sensitive containment; when several elements match, the
/// driver's accessibility tree traversal order decides.
pub fn find_by_text(session: &dyn Session, text: &str) -> Result<Element> {
    session
        .find(&Selector::text_contains(text))
        .map_err(|error| InteractionError::from_driver(format!("text '{text}'"), error))
}

/// What an interaction acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Handle resolved earlier; reused as is on every attempt
    Element { name: String, element: Element },
    /// Resolved from one selector on every attempt
    Locator { name: String, selector: Selector },
    /// Resolved from the first matching selector on every attempt
    Fallback {
        name: String,
        selectors: Vec<Selector>,
    },
}

impl Target {
    pub fn element(name: impl Into<String>, element: Element) -> Self {
        Self::Element {
            name: name.into(),
            element,
        }
    }

    pub fn locator(name: impl Into<String>, selector: Selector) -> Self {
        Self::Locator {
            name: name.into(),
            selector,
        }
    }

    /// Resource id shorthand
    pub fn id(name: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self::locator(name, Selector::id(resource_id))
    }

    pub fn fallback(name: impl Into<String>, selectors: Vec<Selector>) -> Self {
        Self::Fallback {
            name: name.into(),
            selectors,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Element { name, .. }
            | Self::Locator { name, .. }
            | Self::Fallback { name, .. } => name,
        }
    }

    /// Produce an element handle for the current attempt
    pub fn resolve(&self, session: &dyn Session) -> Result<Element> {
        match self {
            Self::Element { element, .. } => Ok(element.clone()),
            Self::Locator { name, selector } => session
                .find(selector)
                .map_err(|error| InteractionError::from_driver(name.as_str(), error)),
            Self::Fallback { selectors, .. } => locate_any(session, selectors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ElementScript, ScriptedSession};
    use std::cell::Cell;

    fn not_found(selector: &str) -> DriverError {
        DriverError::NotFound {
            selector: selector.to_string(),
        }
    }

    #[test]
    fn test_first_success_wins_and_later_strategies_are_skipped() {
        let third_called = Cell::new(false);
        let strategies: Vec<Strategy<'_, &str>> = vec![
            Box::new(|| Err(not_found("s1"))),
            Box::new(|| Ok("s2")),
            Box::new(|| {
                third_called.set(true);
                Ok("s3")
            }),
        ];

        assert_eq!(try_in_order(strategies).unwrap(), "s2");
        assert!(!third_called.get());
    }

    #[test]
    fn test_exhaustion_reports_last_cause() {
        let strategies: Vec<Strategy<'_, ()>> = vec![
            Box::new(|| Err(not_found("id=a"))),
            Box::new(|| Err(not_found("id=b"))),
        ];

        match try_in_order(strategies) {
            Err(InteractionError::LocatorExhausted { attempted, last_cause }) => {
                assert_eq!(attempted, 2);
                assert!(last_cause.contains("id=b"));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn test_fatal_error_stops_remaining_strategies() {
        let second_called = Cell::new(false);
        let strategies: Vec<Strategy<'_, ()>> = vec![
            Box::new(|| Err(DriverError::InvalidSession("session was quit".to_string()))),
            Box::new(|| {
                second_called.set(true);
                Ok(())
            }),
        ];

        let result = try_in_order(strategies);

        assert!(matches!(
            result,
            Err(InteractionError::Driver(DriverError::InvalidSession(_)))
        ));
        assert!(!second_called.get());
    }

    #[test]
    fn test_empty_strategy_list_is_exhausted() {
        let result = try_in_order(Vec::<Strategy<'_, ()>>::new());
        assert!(matches!(
            result,
            Err(InteractionError::LocatorExhausted { attempted: 0, .. })
        ));
    }

    #[test]
    fn test_locate_any_uses_secondary_selector() {
        let session = ScriptedSession::new().with_element(
            Selector::accessibility_id("Add expense"),
            ElementScript::new("el-expense"),
        );

        let element = locate_any(
            &session,
            &[
                Selector::id("com.monefy.app.lite:id/expense_button"),
                Selector::accessibility_id("Add expense"),
            ],
        )
        .unwrap();

        assert_eq!(element.id(), "el-expense");
    }

    #[test]
    fn test_find_by_text_uses_containment_selector() {
        let session = ScriptedSession::new()
            .with_element(
                Selector::id("app:id/title"),
                ElementScript::new("el-title").text("Overview"),
            )
            .with_element(
                Selector::id("app:id/balance"),
                ElementScript::new("el-balance").text("Balance $120"),
            )
            .with_element(
                Selector::id("app:id/footer"),
                ElementScript::new("el-footer").text("Balance carried over"),
            );

        assert_eq!(find_by_text(&session, "Balance").unwrap().id(), "el-balance");
        assert!(matches!(
            find_by_text(&session, "balance"),
            Err(InteractionError::Driver(DriverError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_bound_element_target_skips_lookup() {
        let session = ScriptedSession::new();
        let target = Target::element("cached", Element::new("el-7"));

        assert_eq!(target.resolve(&session).unwrap().id(), "el-7");
        assert!(session.calls().is_empty());
    }
}
