//! Room lifecycle: creating, joining and leaving rooms.
//!
//! `RoomSession` is what a front end holds. It owns at most one room
//! membership at a time, runs that room's `SyncLoop`, and turns user
//! actions into store operations. `Invite` carries a room code, optionally
//! with the full room state inline, between peers.

mod invite;
mod session;

pub use invite::{Invite, InviteError};
pub use session::{PeerPhase, RoomSession, SessionError};
