//! Best-effort key-value channel between peers.
//!
//! The channel is the only thing peers share. It promises very little:
//! a `get` after a successful `put` on the same key eventually returns that
//! value or a newer one, and a `get` on an unknown key returns `Ok(None)`.
//! There is no ordering, no transactions and no push notification.
//!
//! Concrete transports (browser storage, links carrying state, HTTP paste
//! services) live outside this crate and implement `Channel`. Retry and
//! fallback between transports belong inside such an implementation.
//!
//! - `MemoryChannel`: in-process map, shared by clones
//! - `ChaoticChannel`: wrapper that injects failures for testing

mod chaotic;
mod memory;

use std::future::Future;

use thiserror::Error;

pub use chaotic::ChaoticChannel;
pub use memory::MemoryChannel;

/// A channel operation failed. Always transient from the caller's view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// Transport could not be reached.
    #[error("channel unavailable: {0}")]
    Unavailable(String),

    /// Transport refused the operation.
    #[error("channel rejected operation: {0}")]
    Rejected(String),
}

/// Asynchronous key-value transport carrying serialized rooms.
///
/// Must be Clone (the sync loop and the store each hold one), Send + Sync,
/// and `'static`. Implementations typically share state via `Arc`, so
/// clones address the same underlying transport.
pub trait Channel: Clone + Send + Sync + 'static {
    /// Store `value` under `key`, replacing any previous value.
    fn put(
        &self,
        key: &str,
        value: String,
    ) -> impl Future<Output = Result<(), ChannelError>> + Send;

    /// Fetch the value under `key`.
    ///
    /// Returns `Ok(None)` for unknown keys. `Err` is reserved for transport
    /// failures.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, ChannelError>> + Send;
}
