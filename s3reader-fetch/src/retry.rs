//! Bounded retry with a fixed delay.

use std::time::Duration;

use tracing::{debug, warn};

/// Default number of attempts for the credential retry loop.
pub const DEFAULT_MAX_TRIALS: u32 = 10;

/// Default delay between attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

// ============================================================================
// Retry State
// ============================================================================

/// Progress of one retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    /// Failed transient attempts so far.
    pub attempt: u32,
    /// Attempt limit.
    pub max_attempts: u32,
    /// Delay between attempts.
    pub delay: Duration,
}

impl RetryState {
    fn new(policy: &RetryPolicy) -> Self {
        Self {
            attempt: 0,
            max_attempts: policy.max_attempts,
            delay: policy.delay,
        }
    }

    /// Returns true once no attempts remain.
    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }

    fn record_failure(&mut self) {
        self.attempt += 1;
    }
}

// ============================================================================
// Retry Error
// ============================================================================

/// Why a retried operation gave up.
#[derive(Debug)]
pub enum RetryError<E> {
    /// A non-transient error, returned on the attempt that produced it.
    Permanent(E),
    /// All attempts failed transiently.
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// The last transient error. `None` only if no attempt ran.
        last: Option<E>,
    },
}

// ============================================================================
// Retry Policy
// ============================================================================

/// Runs an operation up to `max_attempts` times with a constant delay.
///
/// Only errors accepted by the `is_transient` predicate are retried; every
/// other error is returned immediately. There is no backoff and attempts never
/// overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts.
    pub max_attempts: u32,
    /// Delay between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the default one-second delay.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay: DEFAULT_DELAY,
        }
    }

    /// A single attempt, no retry.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    /// Sets the delay between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Runs `operation`, sleeping the calling thread between attempts.
    ///
    /// # Errors
    ///
    /// See [`RetryError`].
    pub fn run<T, E, F, P>(&self, operation: F, is_transient: P) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        self.run_with_sleep(operation, is_transient, std::thread::sleep)
    }

    /// Like [`RetryPolicy::run`] with an explicit sleep function.
    ///
    /// # Errors
    ///
    /// See [`RetryError`].
    pub fn run_with_sleep<T, E, F, P, S>(
        &self,
        mut operation: F,
        is_transient: P,
        mut sleep: S,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
        P: Fn(&E) -> bool,
        S: FnMut(Duration),
        E: std::fmt::Display,
    {
        let mut state = RetryState::new(self);
        let mut last = None;

        while !state.is_exhausted() {
            debug!(attempt = state.attempt + 1, max_attempts = state.max_attempts, "Attempting operation");

            match operation() {
                Ok(value) => return Ok(value),
                Err(e) if is_transient(&e) => {
                    state.record_failure();
                    warn!(
                        error = %e,
                        attempt = state.attempt,
                        max_attempts = state.max_attempts,
                        "Transient failure, retrying"
                    );
                    last = Some(e);
                    if !state.is_exhausted() {
                        sleep(state.delay);
                    }
                }
                Err(e) => return Err(RetryError::Permanent(e)),
            }
        }

        Err(RetryError::Exhausted {
            attempts: state.attempt,
            last,
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRIALS)
    }
}
