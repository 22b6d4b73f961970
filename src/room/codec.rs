//! JSON wire format for rooms.
//!
//! ## Layout
//!
//! ```json
//! {
//!   "roomId": "AB12CD",
//!   "board": ["X", "", "", "", "O", "", "", "", ""],
//!   "currentTurn": "X",
//!   "winner": null,
//!   "gameOver": false,
//!   "revision": 1718000000000,
//!   "players": { "X": "host", "O": "guest" },
//!   "lastMove": { "position": 4, "player": "O" }
//! }
//! ```
//!
//! Empty cells are empty strings. `players` may be omitted (host only) and
//! `lastMove` is omitted when there is none. Decoding validates cell values
//! and the game invariants; anything else is a `CodecError`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::board::{Board, CELL_COUNT};
use crate::core::mark::Mark;
use crate::core::state::{GameState, StateError};

use super::id::{RoomId, RoomIdError};
use super::roster::{Role, Roster};
use super::state::{LastMove, Room};

/// A payload could not be turned into a `Room`, or vice versa.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Not JSON, or JSON of the wrong shape.
    #[error("malformed room payload: {0}")]
    Json(#[from] serde_json::Error),

    /// `board` does not have nine cells.
    #[error("board has {0} cells, expected 9")]
    BoardLength(usize),

    /// A cell is neither `""`, `"X"` nor `"O"`.
    #[error("cell {index} holds invalid value {value:?}")]
    InvalidCell {
        /// Cell index.
        index: usize,
        /// Offending value.
        value: String,
    },

    /// `lastMove.position` is off the board.
    #[error("last move position {0} is not on the board")]
    InvalidLastMove(usize),

    /// Seats other than host-at-X and guest-at-O.
    #[error("invalid seat assignment")]
    InvalidRoster,

    /// Bad `roomId`.
    #[error(transparent)]
    RoomId(#[from] RoomIdError),

    /// Fields contradict the game invariants.
    #[error(transparent)]
    State(#[from] StateError),
}

/// Seats as they appear on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayersRecord {
    /// Occupant of the `X` seat.
    #[serde(rename = "X")]
    pub x: Option<Role>,
    /// Occupant of the `O` seat.
    #[serde(rename = "O")]
    pub o: Option<Role>,
}

impl Default for PlayersRecord {
    fn default() -> Self {
        Self {
            x: Some(Role::Host),
            o: None,
        }
    }
}

/// Last move as it appears on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMoveRecord {
    /// Cell index.
    pub position: usize,
    /// Mark placed.
    pub player: Mark,
}

/// Flat serialized room, field for field as exchanged between peers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    /// Room code.
    pub room_id: String,
    /// Nine cells: `""`, `"X"` or `"O"`.
    pub board: Vec<String>,
    /// Mark to move.
    pub current_turn: Mark,
    /// Winning mark, if any.
    pub winner: Option<Mark>,
    /// Whether the game has ended.
    pub game_over: bool,
    /// Revision stamp, milliseconds since the epoch.
    pub revision: u64,
    /// Seat assignments.
    #[serde(default)]
    pub players: PlayersRecord,
    /// Most recent move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_move: Option<LastMoveRecord>,
}

impl From<&Room> for RoomRecord {
    fn from(room: &Room) -> Self {
        let game = room.game();
        Self {
            room_id: room.id().as_str().to_string(),
            board: game
                .board()
                .cells()
                .iter()
                .map(|cell| cell.map_or("", Mark::symbol).to_string())
                .collect(),
            current_turn: game.current_turn(),
            winner: game.winner(),
            game_over: game.is_over(),
            revision: room.revision(),
            players: PlayersRecord {
                x: room.roster().seat(Mark::X),
                o: room.roster().seat(Mark::O),
            },
            last_move: room.last_move().map(|m| LastMoveRecord {
                position: m.position,
                player: m.player,
            }),
        }
    }
}

impl TryFrom<RoomRecord> for Room {
    type Error = CodecError;

    fn try_from(record: RoomRecord) -> Result<Self, Self::Error> {
        let id = RoomId::parse(&record.room_id)?;

        if record.board.len() != CELL_COUNT {
            return Err(CodecError::BoardLength(record.board.len()));
        }
        let mut cells = [None; CELL_COUNT];
        for (index, (cell, value)) in cells.iter_mut().zip(&record.board).enumerate() {
            *cell = match value.as_str() {
                "" => None,
                symbol => Some(Mark::from_symbol(symbol).ok_or_else(|| {
                    CodecError::InvalidCell {
                        index,
                        value: value.clone(),
                    }
                })?),
            };
        }

        let game = GameState::from_parts(
            Board::from_cells(cells),
            record.current_turn,
            record.winner,
            record.game_over,
        )?;

        let roster = match (record.players.x, record.players.o) {
            (Some(Role::Host), None) => Roster::host_only(),
            (Some(Role::Host), Some(Role::Guest)) => Roster::full(),
            _ => return Err(CodecError::InvalidRoster),
        };

        let last_move = match record.last_move {
            Some(m) if m.position >= CELL_COUNT => {
                return Err(CodecError::InvalidLastMove(m.position));
            }
            Some(m) => Some(LastMove {
                position: m.position,
                player: m.player,
            }),
            None => None,
        };

        Ok(Room::from_parts(id, roster, record.revision, game, last_move))
    }
}

/// Serialize a room to its JSON wire form.
pub fn encode_room(room: &Room) -> Result<String, CodecError> {
    Ok(serde_json::to_string(&RoomRecord::from(room))?)
}

/// Parse and validate a JSON wire payload.
pub fn decode_room(payload: &str) -> Result<Room, CodecError> {
    let record: RoomRecord = serde_json::from_str(payload)?;
    Room::try_from(record)
}
