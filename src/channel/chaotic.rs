//! Chaotic channel wrapper for fault injection testing
//!
//! Delegates to an inner channel but fails a configurable fraction of
//! operations. The failure sequence comes from a seeded ChaCha8 stream, so a
//! chaos test replays identically for the same seed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{Channel, ChannelError};

/// Channel wrapper that randomly fails operations.
#[derive(Clone, Debug)]
pub struct ChaoticChannel<C: Channel> {
    inner: C,
    state: Arc<Mutex<ChaosState>>,
}

#[derive(Debug)]
struct ChaosState {
    rng: ChaCha8Rng,
    /// Failure rate (0.0 = never fail, 1.0 = always fail)
    failure_rate: f64,
    operations: usize,
    failures: usize,
}

impl<C: Channel> ChaoticChannel<C> {
    /// Wrap `inner`, failing operations with probability `failure_rate`.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    pub fn new(inner: C, failure_rate: f64) -> Self {
        Self::with_seed(inner, failure_rate, 0x1234_5678_9ABC_DEF0)
    }

    /// Create with explicit seed for reproducible chaos
    pub fn with_seed(inner: C, failure_rate: f64, seed: u64) -> Self {
        assert_rate(failure_rate);
        Self {
            inner,
            state: Arc::new(Mutex::new(ChaosState {
                rng: ChaCha8Rng::seed_from_u64(seed),
                failure_rate,
                operations: 0,
                failures: 0,
            })),
        }
    }

    /// Underlying channel.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Change the failure rate for subsequent operations. `1.0` takes the
    /// channel fully offline, `0.0` restores it.
    pub fn set_failure_rate(&self, failure_rate: f64) {
        assert_rate(failure_rate);
        self.lock().failure_rate = failure_rate;
    }

    /// Total operations attempted.
    pub fn operation_count(&self) -> usize {
        self.lock().operations
    }

    /// Operations that were failed on purpose.
    pub fn failure_count(&self) -> usize {
        self.lock().failures
    }

    fn should_fail(&self) -> bool {
        let mut state = self.lock();
        state.operations += 1;
        let rate = state.failure_rate;
        let fail = state.rng.gen_bool(rate);
        if fail {
            state.failures += 1;
        }
        fail
    }

    fn lock(&self) -> MutexGuard<'_, ChaosState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn assert_rate(failure_rate: f64) {
    assert!(
        (0.0..=1.0).contains(&failure_rate),
        "failure_rate must be between 0.0 and 1.0, got {failure_rate}"
    );
}

impl<C: Channel> Channel for ChaoticChannel<C> {
    async fn put(&self, key: &str, value: String) -> Result<(), ChannelError> {
        if self.should_fail() {
            return Err(ChannelError::Unavailable("chaotic failure injection".to_string()));
        }
        self.inner.put(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ChannelError> {
        if self.should_fail() {
            return Err(ChannelError::Unavailable("chaotic failure injection".to_string()));
        }
        self.inner.get(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MemoryChannel;

    #[tokio::test]
    async fn test_zero_rate_never_fails() {
        let channel = ChaoticChannel::new(MemoryChannel::new(), 0.0);
        for i in 0..50 {
            channel.put("k", i.to_string()).await.unwrap();
        }
        assert_eq!(channel.get("k").await, Ok(Some("49".to_string())));
        assert_eq!(channel.operation_count(), 51);
        assert_eq!(channel.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_full_rate_always_fails() {
        let channel = ChaoticChannel::new(MemoryChannel::new(), 1.0);
        assert!(channel.put("k", "v".to_string()).await.is_err());
        assert!(channel.get("k").await.is_err());
        assert!(channel.inner().is_empty());
        assert_eq!(channel.failure_count(), 2);
    }

    #[tokio::test]
    async fn test_same_seed_same_failures() {
        let a = ChaoticChannel::with_seed(MemoryChannel::new(), 0.5, 99);
        let b = ChaoticChannel::with_seed(MemoryChannel::new(), 0.5, 99);

        let mut pattern_a = Vec::new();
        let mut pattern_b = Vec::new();
        for _ in 0..32 {
            pattern_a.push(a.get("k").await.is_err());
            pattern_b.push(b.get("k").await.is_err());
        }

        assert_eq!(pattern_a, pattern_b);
        assert!(pattern_a.iter().any(|failed| *failed));
        assert!(pattern_a.iter().any(|failed| !*failed));
    }

    #[tokio::test]
    async fn test_set_failure_rate_toggles_outage() {
        let channel = ChaoticChannel::new(MemoryChannel::new(), 0.0);
        channel.set_failure_rate(1.0);
        assert!(channel.put("k", "v".to_string()).await.is_err());
        channel.set_failure_rate(0.0);
        assert!(channel.put("k", "v".to_string()).await.is_ok());
    }

    #[test]
    #[should_panic(expected = "failure_rate must be between")]
    fn test_invalid_rate_panics() {
        let _ = ChaoticChannel::new(MemoryChannel::new(), 1.5);
    }
}
