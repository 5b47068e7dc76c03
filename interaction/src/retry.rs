//! Retry driver for single interactions.
//!
//! Each attempt returns an explicit `Result`; the driver inspects the error
//! kind to decide between another attempt, immediate failure, or exhaustion.

use crate::clock::Clock;
use crate::diagnostics::DiagnosticLog;
use crate::error::{InteractionError, Result};
use crate::policy::RetryPolicy;
use std::cell::Cell;

/// Lifecycle of a single interaction.
///
/// `Idle -> WaitingPrecondition -> Executing -> Success | Failed`, with
/// `Failed` looping back to `WaitingPrecondition` while attempts remain and
/// ending in `RetryExhausted` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    WaitingPrecondition,
    Executing,
    Success,
    Failed,
    RetryExhausted,
}

/// Observable phase cell shared between the retry driver and attempts
#[derive(Debug)]
pub struct PhaseTracker {
    phase: Cell<Phase>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            phase: Cell::new(Phase::Idle),
        }
    }

    pub fn get(&self) -> Phase {
        self.phase.get()
    }

    pub fn set(&self, phase: Phase) {
        tracing::trace!(?phase, "interaction phase");
        self.phase.set(phase);
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `attempt` under `policy`.
///
/// Attempts are numbered from 1. Transient failures are recorded to `log` and
/// retried after `policy.interval()`; the pause is skipped after the final
/// attempt. A non-transient failure is recorded and returned as is.
pub fn run_with_retry<T, F>(
    policy: &RetryPolicy,
    clock: &dyn Clock,
    label: &str,
    log: &DiagnosticLog,
    phase: &PhaseTracker,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut(u32) -> Result<T>,
{
    let mut number = 1;
    loop {
        phase.set(Phase::WaitingPrecondition);
        match attempt(number) {
            Ok(value) => {
                phase.set(Phase::Success);
                return Ok(value);
            }
            Err(error) => {
                phase.set(Phase::Failed);
                log.record(label, number, &error);
                tracing::warn!(
                    action = label,
                    attempt = number,
                    max_attempts = policy.max_attempts(),
                    error = %error,
                    "interaction attempt failed"
                );

                if !error.is_transient() {
                    return Err(error);
                }

                if number >= policy.max_attempts() {
                    phase.set(Phase::RetryExhausted);
                    tracing::error!(action = label, attempts = number, "retries exhausted");
                    return Err(InteractionError::RetryExhausted {
                        action: label.to_string(),
                        attempts: number,
                        source: Box::new(error),
                    });
                }

                clock.sleep(policy.interval());
                number += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DriverError;
    use crate::testing::ManualClock;
    use std::time::Duration;

    fn timeout() -> InteractionError {
        InteractionError::PreconditionTimeout {
            condition: "visible".to_string(),
            timeout: Duration::from_secs(20),
        }
    }

    #[test]
    fn test_permanent_failure_runs_every_attempt() {
        for max_attempts in 1..=5 {
            let clock = ManualClock::new();
            let log = DiagnosticLog::new();
            let phase = PhaseTracker::new();
            let policy = RetryPolicy::new(max_attempts, Duration::from_millis(100)).unwrap();
            let mut calls = 0;

            let result: Result<()> = run_with_retry(&policy, &clock, "click_x", &log, &phase, |_| {
                calls += 1;
                Err(timeout())
            });

            assert_eq!(calls, max_attempts);
            assert_eq!(clock.sleeps().len() as u32, max_attempts - 1);
            assert_eq!(log.len() as u32, max_attempts);
            assert_eq!(phase.get(), Phase::RetryExhausted);
            match result {
                Err(InteractionError::RetryExhausted { attempts, source, .. }) => {
                    assert_eq!(attempts, max_attempts);
                    assert!(matches!(*source, InteractionError::PreconditionTimeout { .. }));
                }
                other => panic!("expected exhaustion, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_success_after_failures() {
        let clock = ManualClock::new();
        let log = DiagnosticLog::new();
        let phase = PhaseTracker::new();
        let policy = RetryPolicy::new(3, Duration::from_millis(100)).unwrap();

        let value = run_with_retry(&policy, &clock, "read_text_total", &log, &phase, |n| {
            if n < 3 {
                Err(timeout())
            } else {
                Ok(n)
            }
        })
        .unwrap();

        assert_eq!(value, 3);
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(100); 2]);
        assert_eq!(log.len(), 2);
        assert_eq!(phase.get(), Phase::Success);
    }

    #[test]
    fn test_fatal_error_stops_immediately() {
        let clock = ManualClock::new();
        let log = DiagnosticLog::new();
        let phase = PhaseTracker::new();
        let mut calls = 0;

        let result: Result<()> =
            run_with_retry(&RetryPolicy::default(), &clock, "click_x", &log, &phase, |_| {
                calls += 1;
                Err(DriverError::InvalidSession("deleted".to_string()).into())
            });

        assert_eq!(calls, 1);
        assert!(clock.sleeps().is_empty());
        assert_eq!(log.len(), 1);
        assert!(matches!(
            result,
            Err(InteractionError::Driver(DriverError::InvalidSession(_)))
        ));
    }
}
