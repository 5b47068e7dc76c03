use crate::clock::Clock;
use crate::error::{DriverError, InteractionError, Result};
use crate::policy::WaitPolicy;

/// Poll `probe` until it yields a value or the policy's timeout elapses.
///
/// The probe is always evaluated at least once, even with a zero timeout.
/// `Ok(None)` means "not yet"; an `Err` ends the wait immediately, so probes
/// that want to ignore a failure kind must map it to `Ok(None)` themselves.
pub fn wait_until<T, F>(
    clock: &dyn Clock,
    policy: &WaitPolicy,
    condition: &str,
    mut probe: F,
) -> Result<T>
where
    F: FnMut() -> std::result::Result<Option<T>, DriverError>,
{
    let started = clock.now();
    loop {
        if let Some(value) = probe()? {
            return Ok(value);
        }

        let elapsed = clock.now().saturating_sub(started);
        if elapsed >= policy.timeout() {
            return Err(InteractionError::PreconditionTimeout {
                condition: condition.to_string(),
                timeout: policy.timeout(),
            });
        }

        let remaining = policy.timeout() - elapsed;
        clock.sleep(policy.poll_interval().min(remaining));
    }
}
