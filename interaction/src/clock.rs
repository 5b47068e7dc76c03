use std::time::{Duration, Instant};

/// Time source for waits and retry pauses.
///
/// Everything that blocks goes through a `Clock` so worst-case timing can be
/// observed without real sleeps.
pub trait Clock {
    /// Monotonic time elapsed since the clock was created
    fn now(&self) -> Duration;

    /// Block the calling thread
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `Instant` and `thread::sleep`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}
