//! Rooms: the unit of replication.
//!
//! A `Room` pairs a `GameState` with the metadata peers need to reconcile
//! their copies: an id, who has joined, and a revision stamp. Every peer
//! holds its own full copy; none is authoritative.
//!
//! - `id`: room codes and their normalization
//! - `roster`: seats, roles and the local peer's identity
//! - `state`: the `Room` itself and the revision bump rule
//! - `codec`: the JSON wire format exchanged over a channel

pub mod id;
pub mod roster;
pub mod state;
pub mod codec;

pub use id::{RoomId, RoomIdError};
pub use roster::{PeerIdentity, Role, Roster};
pub use state::{next_revision, LastMove, Room};
pub use codec::{decode_room, encode_room, CodecError, LastMoveRecord, PlayersRecord, RoomRecord};
