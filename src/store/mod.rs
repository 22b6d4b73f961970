//! Replicated state store: binds rooms to a channel.
//!
//! `RoomStore` creates, joins, mutates and reads rooms, writing every local
//! mutation through to the channel straight away. Writes are best effort:
//! a failed write is logged and reported in the returned `Commit` so the
//! sync loop can retry it, but the local mutation stands.

mod error;
mod room_store;

pub use error::{JoinError, MoveRejected, StoreError};
pub use room_store::{Commit, RoomStore};
