//! Sync configuration parameters.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Shortest room code accepted by the builder (36^6 codes).
pub const MIN_ROOM_CODE_LEN: usize = 6;

/// Room, channel and polling configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Sync loop period in milliseconds (default: 1000).
    pub poll_interval_ms: u64,

    /// Length of generated room codes (default: 6, minimum 6).
    pub room_code_len: usize,

    /// Prefix prepended to the room id to form the channel key
    /// (default: `"ttt_room_"`).
    pub key_prefix: String,

    /// Seed for room-code generation. `None` draws from OS entropy.
    /// Same seed produces the same sequence of room codes.
    pub seed: Option<u64>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            room_code_len: MIN_ROOM_CODE_LEN,
            key_prefix: "ttt_room_".to_string(),
            seed: None,
        }
    }
}

impl SyncConfig {
    /// Poll interval as a `Duration`.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Channel key for a room id.
    #[must_use]
    pub fn key_for(&self, room_id: &str) -> String {
        format!("{}{room_id}", self.key_prefix)
    }

    /// Replace values no store can run with by their defaults.
    ///
    /// The fields are public and deserializable, so they can bypass the
    /// builder asserts. A zero poll interval is reset to the default, and a
    /// room code length below `MIN_ROOM_CODE_LEN` is raised to it.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if self.poll_interval_ms == 0 {
            let fallback = Self::default().poll_interval_ms;
            warn!(fallback_ms = fallback, "poll interval of 0 ms replaced");
            self.poll_interval_ms = fallback;
        }
        if self.room_code_len < MIN_ROOM_CODE_LEN {
            warn!(
                room_code_len = self.room_code_len,
                fallback = MIN_ROOM_CODE_LEN,
                "room code length too short, raised"
            );
            self.room_code_len = MIN_ROOM_CODE_LEN;
        }
        self
    }

    /// Create a new config with a custom poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        assert!(!interval.is_zero(), "Poll interval must be non-zero");
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Create a new config with a custom room code length.
    pub fn with_room_code_len(mut self, len: usize) -> Self {
        assert!(
            len >= MIN_ROOM_CODE_LEN,
            "Room codes must be at least {MIN_ROOM_CODE_LEN} characters"
        );
        self.room_code_len = len;
        self
    }

    /// Create a new config with a custom channel key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Create a new config with a fixed room-code seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
