//! Pure tic-tac-toe rules.
//!
//! ## Move validation order
//!
//! 1. Cell index must be `0..9` (`MoveError::CellOutOfRange`)
//! 2. Game must still be running (`MoveError::GameAlreadyOver`)
//! 3. Cell must be empty (`MoveError::CellOccupied`)

use thiserror::Error;

use crate::core::board::{Board, CELL_COUNT, LINES};
use crate::core::mark::Mark;
use crate::core::state::GameState;

/// Reasons a move is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The target cell already holds a mark.
    #[error("cell {cell} is already occupied")]
    CellOccupied {
        /// Target cell.
        cell: usize,
    },

    /// The game has ended; no further moves are accepted.
    #[error("the game is already over")]
    GameAlreadyOver,

    /// The cell index is not on the board.
    #[error("cell {cell} is not on the board")]
    CellOutOfRange {
        /// Target cell.
        cell: usize,
    },
}

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// One mark completed a line.
    Winner(Mark),
    /// Full board, no line.
    Draw,
}

impl GameResult {
    /// Check if `mark` won.
    #[must_use]
    pub fn is_winner(&self, mark: Mark) -> bool {
        matches!(self, GameResult::Winner(m) if *m == mark)
    }
}

/// Play `current_turn`'s mark at `cell`.
///
/// On success the returned state has the cell filled and either a result
/// recorded (winner or full board, turn frozen) or the turn handed to the
/// other mark.
///
/// ```
/// use ttt_sync::core::{GameState, Mark};
/// use ttt_sync::rules::{apply_move, MoveError};
///
/// let state = apply_move(&GameState::new(), 4).unwrap();
/// assert_eq!(state.board()[4], Some(Mark::X));
/// assert_eq!(state.current_turn(), Mark::O);
///
/// assert_eq!(apply_move(&state, 4), Err(MoveError::CellOccupied { cell: 4 }));
/// ```
pub fn apply_move(state: &GameState, cell: usize) -> Result<GameState, MoveError> {
    if cell >= CELL_COUNT {
        return Err(MoveError::CellOutOfRange { cell });
    }
    if state.is_over {
        return Err(MoveError::GameAlreadyOver);
    }
    if !state.board.is_empty_at(cell) {
        return Err(MoveError::CellOccupied { cell });
    }

    let mut next = *state;
    next.board.place(cell, state.current_turn);

    if let Some(winner) = check_winner(&next.board) {
        next.winner = Some(winner);
        next.is_over = true;
    } else if next.board.is_full() {
        next.is_over = true;
    } else {
        next.current_turn = state.current_turn.other();
    }

    Ok(next)
}

/// Mark owning the first complete line in `LINES` order, if any.
#[must_use]
pub fn check_winner(board: &Board) -> Option<Mark> {
    LINES.iter().find_map(|&[a, b, c]| match board[a] {
        Some(mark) if board[b] == Some(mark) && board[c] == Some(mark) => Some(mark),
        _ => None,
    })
}

/// Board full and nobody won.
#[must_use]
pub fn is_draw(state: &GameState) -> bool {
    state.board.is_full() && state.winner.is_none()
}

/// Start over: empty board, `X` to move, no result.
#[must_use]
pub fn reset(_state: &GameState) -> GameState {
    GameState::new()
}

/// Final result, or `None` while the game continues.
#[must_use]
pub fn outcome(state: &GameState) -> Option<GameResult> {
    match (state.winner, state.is_over) {
        (Some(mark), _) => Some(GameResult::Winner(mark)),
        (None, true) => Some(GameResult::Draw),
        (None, false) => None,
    }
}
