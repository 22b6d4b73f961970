//! The replicated room.
//!
//! ## Revisions
//!
//! Every mutation stamps the room with `next_revision(previous, now)`, the
//! later of the wall clock and `previous + 1`. Peers order copies by this
//! value alone: the higher revision wins, with no merge.

use crate::core::mark::Mark;
use crate::core::state::GameState;
use crate::rules::{apply_move, reset, MoveError};

use super::id::RoomId;
use super::roster::Roster;

/// Revision for the next mutation: strictly greater than `previous`, and at
/// least `now_millis`.
///
/// ```
/// use ttt_sync::room::next_revision;
///
/// assert_eq!(next_revision(100, 500), 500);
/// // A stalled or rewound clock still moves the revision forward.
/// assert_eq!(next_revision(500, 500), 501);
/// assert_eq!(next_revision(500, 20), 501);
/// ```
#[must_use]
pub fn next_revision(previous: u64, now_millis: u64) -> u64 {
    now_millis.max(previous.saturating_add(1))
}

/// The most recent move, kept so a peer can highlight what changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LastMove {
    /// Cell index `0..9`.
    pub position: usize,
    /// Mark that was placed.
    pub player: Mark,
}

/// One peer's copy of a room.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    roster: Roster,
    revision: u64,
    game: GameState,
    last_move: Option<LastMove>,
}

impl Room {
    /// Freshly created room: host seated, empty board, `X` to move.
    #[must_use]
    pub fn new(id: RoomId, revision: u64) -> Self {
        Self {
            id,
            roster: Roster::host_only(),
            revision,
            game: GameState::new(),
            last_move: None,
        }
    }

    /// Assemble a room from its parts.
    #[must_use]
    pub fn from_parts(
        id: RoomId,
        roster: Roster,
        revision: u64,
        game: GameState,
        last_move: Option<LastMove>,
    ) -> Self {
        Self {
            id,
            roster,
            revision,
            game,
            last_move,
        }
    }

    /// Room code.
    #[must_use]
    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Seat assignments.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Revision stamp.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Game in this room.
    #[must_use]
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Most recent move, if any since the last restart.
    #[must_use]
    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    /// Whether this copy should replace `other`.
    #[must_use]
    pub fn is_newer_than(&self, other: &Room) -> bool {
        self.revision > other.revision
    }

    /// Copy with the guest seated and the revision bumped.
    pub(crate) fn seat_guest(&self, now_millis: u64) -> Self {
        Self {
            roster: self.roster.with_guest(),
            revision: next_revision(self.revision, now_millis),
            ..self.clone()
        }
    }

    /// Copy with the current mark played at `cell` and the revision bumped.
    pub(crate) fn play(&self, cell: usize, now_millis: u64) -> Result<Self, MoveError> {
        let player = self.game.current_turn();
        let game = apply_move(&self.game, cell)?;
        Ok(Self {
            game,
            last_move: Some(LastMove { position: cell, player }),
            revision: next_revision(self.revision, now_millis),
            ..self.clone()
        })
    }

    /// Copy with a fresh game, the roster kept and the revision bumped.
    pub(crate) fn restarted(&self, now_millis: u64) -> Self {
        Self {
            game: reset(&self.game),
            last_move: None,
            revision: next_revision(self.revision, now_millis),
            ..self.clone()
        }
    }
}
