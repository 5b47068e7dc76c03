//! Interaction - resilient UI interaction layer for mobile test automation
//!
//! This crate wraps element lookup, click, text entry and text reads against a
//! device automation session in a bounded wait/retry policy, provides a
//! fallback locator stack for identifiers that drift between app versions, and
//! records best-effort screenshots when an interaction is given up on.

// Core modules
pub mod config;
pub mod error;
pub mod policy;
pub mod session;

// Interaction machinery
pub mod clock;
pub mod diagnostics;
pub mod interactor;
pub mod locator;
pub mod retry;
pub mod screenshot;
pub mod wait;

// Driver implementations
pub mod appium;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export main types for convenience
pub use appium::AppiumSession;
pub use clock::{Clock, SystemClock};
pub use config::DeviceConfig;
pub use diagnostics::{DiagnosticEntry, DiagnosticLog};
pub use error::{ConfigError, DriverError, InteractionError, Result};
pub use interactor::{Interaction, Interactor, Outcome, Precondition, Screen};
pub use locator::{find_by_text, locate_any, try_in_order, Strategy, Target};
pub use policy::{RetryPolicy, WaitPolicy};
pub use retry::Phase;
pub use screenshot::ScreenshotRecorder;
pub use session::{Element, Selector, Session};

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_policies() {
        let retry = RetryPolicy::default();
        assert_eq!(retry.max_attempts(), 3);
        assert_eq!(retry.interval(), Duration::from_millis(1000));

        let wait = WaitPolicy::default();
        assert_eq!(wait.timeout(), Duration::from_secs(20));
        assert_eq!(wait.poll_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_error_types() {
        let error = InteractionError::LocatorExhausted {
            attempted: 3,
            last_cause: "no element matches id=add".to_string(),
        };
        assert!(error.to_string().contains("3 strategies"));

        let error = DriverError::InvalidSession("gone".to_string());
        assert!(!error.is_transient());
    }
}
