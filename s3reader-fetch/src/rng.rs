//! Process-wide pseudo-random generator.
//!
//! Client implementations are free to draw from this generator while building
//! sessions (jittered retries, request ids). Anything else in the process that
//! seeds it for reproducibility must not observe those draws, so remote fetches
//! run inside an [`RngStateGuard`] that puts the state back when it drops.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::trace;

static GLOBAL_RNG: OnceLock<Mutex<StdRng>> = OnceLock::new();

fn lock() -> MutexGuard<'static, StdRng> {
    GLOBAL_RNG
        .get_or_init(|| Mutex::new(StdRng::from_entropy()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Runs `f` with exclusive access to the global generator.
pub fn with_global_rng<R>(f: impl FnOnce(&mut StdRng) -> R) -> R {
    f(&mut lock())
}

/// Reseeds the global generator.
pub fn seed_global_rng(seed: u64) {
    *lock() = StdRng::seed_from_u64(seed);
}

/// Copy of the global generator's internal state.
#[derive(Debug, Clone)]
pub struct RngSnapshot(StdRng);

impl RngSnapshot {
    /// Captures the current global state.
    pub fn capture() -> Self {
        Self(lock().clone())
    }

    /// Overwrites the global state with this snapshot.
    pub fn restore(&self) {
        *lock() = self.0.clone();
    }

    /// Returns a generator positioned at the captured state.
    pub fn to_rng(&self) -> StdRng {
        self.0.clone()
    }
}

/// Restores the global generator when dropped.
#[derive(Debug)]
#[must_use = "the state is restored when the guard drops"]
pub struct RngStateGuard {
    saved: RngSnapshot,
}

impl RngStateGuard {
    /// Snapshots the global state.
    pub fn capture() -> Self {
        trace!("Captured global RNG state");
        Self {
            saved: RngSnapshot::capture(),
        }
    }
}

impl Drop for RngStateGuard {
    fn drop(&mut self) {
        self.saved.restore();
        trace!("Restored global RNG state");
    }
}

/// Serializes tests that inspect the global generator.
#[cfg(test)]
pub(crate) static TEST_LOCK: Mutex<()> = Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    fn next_values(rng: &mut StdRng) -> [u64; 4] {
        [rng.next_u64(), rng.next_u64(), rng.next_u64(), rng.next_u64()]
    }

    #[test]
    fn test_seed_is_reproducible() {
        let _serial = TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        seed_global_rng(7);
        let first = with_global_rng(next_values);
        seed_global_rng(7);
        let second = with_global_rng(next_values);
        assert_eq!(first, second);
    }

    #[test]
    fn test_guard_restores_state() {
        let _serial = TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        seed_global_rng(42);
        let before = RngSnapshot::capture();
        {
            let _guard = RngStateGuard::capture();
            with_global_rng(|rng| rng.next_u64());
        }
        let after = RngSnapshot::capture();

        assert_eq!(next_values(&mut before.to_rng()), next_values(&mut after.to_rng()));
    }

    #[test]
    fn test_guard_restores_on_panic() {
        let _serial = TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        seed_global_rng(3);
        let before = RngSnapshot::capture();
        let result = std::panic::catch_unwind(|| {
            let _guard = RngStateGuard::capture();
            with_global_rng(|rng| rng.next_u64());
            panic!("client blew up");
        });
        assert!(result.is_err());

        let after = RngSnapshot::capture();
        assert_eq!(next_values(&mut before.to_rng()), next_values(&mut after.to_rng()));
    }
}
