//! Synchronization loop: polling reconciliation between peers.
//!
//! ## Model
//!
//! Each peer keeps its own `Replica` of a room. A `SyncLoop` polls the
//! channel on a fixed interval and applies last-writer-wins by revision:
//! a strictly newer remote copy replaces the local one and the update
//! callback fires; anything else leaves local state alone. Local moves are
//! written through immediately by the store; the loop exists to pick up the
//! other peer's writes and to retry local writes that failed.
//!
//! There is no merge. If both peers write from the same base revision, the
//! later revision silently wins.

mod driver;
mod replica;

pub use driver::{tick, SyncLoop, TickOutcome};
pub use replica::{Replica, ReplicaHandle};
