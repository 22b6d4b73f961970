//! # ttt-sync
//!
//! Two-peer tic-tac-toe replicated over a best-effort key-value channel.
//!
//! ## Design Principles
//!
//! 1. **Pure Rules**: The rules engine is a set of pure functions over
//!    `GameState`. Nothing in `rules` touches the network or a clock.
//!
//! 2. **Whole-State Replication**: Peers exchange complete room snapshots.
//!    The copy with the higher revision wins; there is no merge.
//!
//! 3. **Channel Agnostic**: Storage is a `Channel` trait. An in-memory
//!    channel and a fault-injecting wrapper ship with the crate.
//!
//! ## Architecture
//!
//! - **Revisions**: Every mutation stamps the room with the later of the
//!   wall clock and the previous revision plus one.
//!
//! - **Polling**: Each peer runs a `SyncLoop` that reads the remote copy on
//!   a fixed interval and adopts it when strictly newer.
//!
//! ## Modules
//!
//! - `core`: Marks, board, game state, clock, room-code RNG, configuration
//! - `rules`: Move validation, win and draw detection
//! - `room`: Room codes, seats, revisions, JSON wire format
//! - `channel`: Key-value channel trait and implementations
//! - `store`: Create, join, move and restart against a channel
//! - `sync`: Local replica and the polling loop
//! - `lobby`: Per-peer session lifecycle and invite links

pub mod core;
pub mod rules;
pub mod room;
pub mod channel;
pub mod store;
pub mod sync;
pub mod lobby;

// Re-export commonly used types
pub use crate::core::{
    Mark, Board, CELL_COUNT,
    GameState, StateError,
    Clock, SystemClock, ManualClock,
    RoomCodeRng, SyncConfig,
};

pub use crate::rules::{apply_move, check_winner, is_draw, reset, GameResult, MoveError};

pub use crate::room::{
    RoomId, RoomIdError, Room, LastMove, Roster, Role, PeerIdentity,
    encode_room, decode_room, CodecError,
};

pub use crate::channel::{Channel, ChannelError, MemoryChannel, ChaoticChannel};

pub use crate::store::{Commit, RoomStore, JoinError, MoveRejected, StoreError};

pub use crate::sync::{tick, SyncLoop, TickOutcome, Replica, ReplicaHandle};

pub use crate::lobby::{Invite, InviteError, PeerPhase, RoomSession, SessionError};
