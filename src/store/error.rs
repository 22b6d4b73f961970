//! Store error types.

use thiserror::Error;

use crate::channel::ChannelError;
use crate::core::mark::Mark;
use crate::room::{CodecError, RoomId};
use crate::rules::MoveError;

/// A local move was refused. The room is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejected {
    /// The local peer's mark is not the one to move.
    #[error("not your turn: {turn} to move, you play {mark}")]
    NotYourTurn {
        /// Mark whose turn it is.
        turn: Mark,
        /// Local peer's mark.
        mark: Mark,
    },

    /// The rules engine refused the move.
    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Joining a room failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// Nothing stored under this room code, and no inline state supplied.
    #[error("room {0} not found, check the room code")]
    RoomNotFound(RoomId),
}

/// Writing a room to the channel failed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The room could not be serialized.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The channel refused or could not be reached.
    #[error(transparent)]
    Channel(#[from] ChannelError),
}
