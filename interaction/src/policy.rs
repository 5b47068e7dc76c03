use crate::error::{InteractionError, Result};
use std::time::Duration;

/// Bounded retry behavior for a single interaction.
///
/// `max_attempts` counts every attempt, the first one included. A permanently
/// failing interaction runs exactly `max_attempts` times and pauses `interval`
/// between consecutive attempts, never after the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    interval: Duration,
}

impl RetryPolicy {
    /// Attempts used by page interactions unless overridden.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    /// Pause between attempts unless overridden.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

    /// Create a retry policy, rejecting a zero attempt budget
    pub fn new(max_attempts: u32, interval: Duration) -> Result<Self> {
        if max_attempts == 0 {
            return Err(InteractionError::InvalidPolicy {
                message: "max_attempts must be at least 1".to_string(),
            });
        }
        Ok(Self {
            max_attempts,
            interval,
        })
    }

    /// Single attempt, no pauses
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            interval: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Upper bound on time spent pausing between attempts
    pub fn total_pause(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts - 1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            interval: Self::DEFAULT_INTERVAL,
        }
    }
}

/// Bounded polling used while waiting for an element to reach a state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    timeout: Duration,
    poll_interval: Duration,
}

impl WaitPolicy {
    /// Precondition wait applied before every interaction attempt.
    pub const PRECONDITION: WaitPolicy = WaitPolicy {
        timeout: Duration::from_secs(20),
        poll_interval: Duration::from_millis(500),
    };

    /// Longer wait used when polling for an element to appear at all.
    pub const FLUENT: WaitPolicy = WaitPolicy {
        timeout: Duration::from_secs(30),
        poll_interval: Duration::from_millis(500),
    };

    const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

    /// Create a wait policy. Poll intervals below one millisecond are raised
    /// to one millisecond so a wait always makes progress toward its timeout.
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval: poll_interval.max(Self::MIN_POLL_INTERVAL),
        }
    }

    /// Check the condition once and give up immediately if it does not hold
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, Self::MIN_POLL_INTERVAL)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Same polling cadence with a different timeout
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::PRECONDITION
    }
}
