use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;

use super::{Channel, ChannelError};

/// In-memory channel for tests and same-process peers.
///
/// Clones share one map, so two sessions holding clones behave like two
/// browser tabs sharing local storage. Every operation completes
/// immediately.
#[derive(Clone, Debug, Default)]
pub struct MemoryChannel {
    inner: Arc<Mutex<MemoryChannelInner>>,
}

#[derive(Debug, Default)]
struct MemoryChannelInner {
    values: FxHashMap<String, String>,
    /// Successful puts, for tests asserting publish behaviour.
    writes: usize,
}

impl MemoryChannel {
    /// Create a new empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().values.len()
    }

    /// Whether nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().values.is_empty()
    }

    /// Total successful writes since creation.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Current raw value under `key`, bypassing the async interface.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    /// Drop `key`, simulating an expired or cleared entry.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.lock().values.remove(key)
    }

    // A panic while holding the lock cannot leave the map half-written, so
    // a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, MemoryChannelInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Channel for MemoryChannel {
    async fn put(&self, key: &str, value: String) -> Result<(), ChannelError> {
        let mut inner = self.lock();
        inner.values.insert(key.to_string(), value);
        inner.writes += 1;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ChannelError> {
        Ok(self.lock().values.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_unknown_key_is_none() {
        let channel = MemoryChannel::new();
        assert_eq!(channel.get("missing").await, Ok(None));
        assert!(channel.is_empty());
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let channel = MemoryChannel::new();
        channel.put("k", "v1".to_string()).await.unwrap();
        channel.put("k", "v2".to_string()).await.unwrap();

        assert_eq!(channel.get("k").await, Ok(Some("v2".to_string())));
        assert_eq!(channel.len(), 1);
        assert_eq!(channel.write_count(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let a = MemoryChannel::new();
        let b = a.clone();
        a.put("room", "state".to_string()).await.unwrap();

        assert_eq!(b.peek("room"), Some("state".to_string()));
        assert_eq!(b.remove("room"), Some("state".to_string()));
        assert_eq!(a.get("room").await, Ok(None));
    }
}
