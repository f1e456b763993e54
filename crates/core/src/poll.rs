//! Polling policy for asynchronous generation jobs.
//!
//! Leonardo offers no completion callback: after submitting a job the
//! client waits, then fetches the generation record and checks whether
//! images are present. [`PollPolicy`] makes that wait explicit and
//! configurable — an initial wait sized to the expected render time,
//! followed by a bounded number of re-polls with clamped exponential
//! backoff.

use std::time::Duration;

/// Tunable parameters for awaiting one generation job.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Wait before the first status fetch.
    pub initial_wait: Duration,
    /// Delay before the second status fetch.
    pub retry_interval: Duration,
    /// Upper bound on the delay between fetches.
    pub max_interval: Duration,
    /// Factor by which the delay grows after each empty fetch.
    pub multiplier: f64,
    /// Total number of status fetches before giving up.
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::first_pass()
    }
}

impl PollPolicy {
    /// Policy for first-pass generations (~30 s typical render time).
    pub fn first_pass() -> Self {
        Self {
            initial_wait: Duration::from_secs(30),
            retry_interval: Duration::from_secs(5),
            max_interval: Duration::from_secs(30),
            multiplier: 2.0,
            max_attempts: 5,
        }
    }

    /// Policy for combine-pass generations, which render slower.
    pub fn combine() -> Self {
        Self {
            initial_wait: Duration::from_secs(60),
            ..Self::first_pass()
        }
    }

    /// Policy for reduced-resolution preview generations.
    pub fn preview() -> Self {
        Self {
            initial_wait: Duration::from_secs(20),
            ..Self::first_pass()
        }
    }

    /// One fixed wait followed by exactly one status fetch, no re-poll.
    ///
    /// Reproduces the original sleep-then-fetch behaviour for callers
    /// that want it.
    pub fn single_fetch(wait: Duration) -> Self {
        Self {
            initial_wait: wait,
            max_attempts: 1,
            ..Self::first_pass()
        }
    }
}

/// Calculate the next backoff delay from the current delay and policy.
///
/// The result is clamped to [`PollPolicy::max_interval`].
pub fn next_interval(current: Duration, policy: &PollPolicy) -> Duration {
    let next_ms = (current.as_millis() as f64 * policy.multiplier) as u64;
    Duration::from_millis(next_ms).min(policy.max_interval)
}
