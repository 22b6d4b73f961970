//! Game state: board, whose turn it is, and the result.
//!
//! ## Invariants
//!
//! - `is_over` holds iff there is a winner or the board is full.
//! - A winner is only recorded when that mark owns a full line.
//! - Once a game is over `current_turn` is frozen at the mark that made the
//!   final move.
//!
//! `GameState::new` and the rules engine maintain these by construction.
//! `GameState::from_parts` checks them for states that arrive from a peer.

use smallvec::SmallVec;
use thiserror::Error;

use super::board::{Board, CELL_COUNT};
use super::mark::Mark;
use crate::rules::check_winner;

/// A state assembled from parts violates a game invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// A winner is set but the game is not marked over.
    #[error("winner {0} recorded but game is not over")]
    WinnerWithoutGameOver(Mark),

    /// The game is marked over with no winner and empty cells left.
    #[error("game is over without a winner on a board that is not full")]
    OverWithoutResult,

    /// The board is full but the game is not marked over.
    #[error("board is full but game is not over")]
    FullBoardNotOver,

    /// The recorded winner disagrees with the board.
    #[error("recorded winner {recorded:?} but board shows {actual:?}")]
    WinnerMismatch {
        /// Winner carried by the state.
        recorded: Option<Mark>,
        /// Winner found by scanning the board.
        actual: Option<Mark>,
    },
}

/// Complete game state for one tic-tac-toe game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) current_turn: Mark,
    pub(crate) winner: Option<Mark>,
    pub(crate) is_over: bool,
}

impl GameState {
    /// Fresh game: empty board, `X` to move.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            board: Board::new(),
            current_turn: Mark::X,
            winner: None,
            is_over: false,
        }
    }

    /// Assemble a state from its parts, checking the game invariants.
    ///
    /// ```
    /// use ttt_sync::core::{Board, GameState, Mark};
    ///
    /// let state = GameState::from_parts(Board::new(), Mark::O, None, false).unwrap();
    /// assert_eq!(state.current_turn(), Mark::O);
    ///
    /// // A winner on an unfinished game is rejected.
    /// assert!(GameState::from_parts(Board::new(), Mark::X, Some(Mark::X), false).is_err());
    /// ```
    pub fn from_parts(
        board: Board,
        current_turn: Mark,
        winner: Option<Mark>,
        is_over: bool,
    ) -> Result<Self, StateError> {
        if let Some(mark) = winner {
            if !is_over {
                return Err(StateError::WinnerWithoutGameOver(mark));
            }
        }

        let actual = check_winner(&board);
        if actual != winner {
            return Err(StateError::WinnerMismatch { recorded: winner, actual });
        }

        if is_over && winner.is_none() && !board.is_full() {
            return Err(StateError::OverWithoutResult);
        }
        if !is_over && board.is_full() {
            return Err(StateError::FullBoardNotOver);
        }

        Ok(Self {
            board,
            current_turn,
            winner,
            is_over,
        })
    }

    /// The board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Mark allowed to move next (frozen once the game is over).
    #[must_use]
    pub const fn current_turn(&self) -> Mark {
        self.current_turn
    }

    /// Winning mark, if any.
    #[must_use]
    pub const fn winner(&self) -> Option<Mark> {
        self.winner
    }

    /// Whether the game has ended by a win or a full board.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.is_over
    }

    /// Empty cells a move may target. Empty once the game is over.
    #[must_use]
    pub fn legal_moves(&self) -> SmallVec<[usize; CELL_COUNT]> {
        if self.is_over {
            return SmallVec::new();
        }
        self.board.empty_cells()
    }

    /// Human-readable status for the peer holding `mark`.
    ///
    /// ```
    /// use ttt_sync::core::{GameState, Mark};
    ///
    /// let state = GameState::new();
    /// assert_eq!(state.status_for(Mark::X), "Your turn!");
    /// assert_eq!(state.status_for(Mark::O), "Player X's turn");
    /// ```
    #[must_use]
    pub fn status_for(&self, mark: Mark) -> String {
        match (self.winner, self.is_over) {
            (Some(winner), _) => format!("{winner} wins!"),
            (None, true) => "Draw!".to_string(),
            (None, false) if self.current_turn == mark => "Your turn!".to_string(),
            (None, false) => format!("Player {}'s turn", self.current_turn),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(layout: &str) -> Board {
        let mut cells = [None; CELL_COUNT];
        for (cell, ch) in cells.iter_mut().zip(layout.chars()) {
            *cell = match ch {
                'X' => Some(Mark::X),
                'O' => Some(Mark::O),
                _ => None,
            };
        }
        Board::from_cells(cells)
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new();
        assert_eq!(state.board(), &Board::new());
        assert_eq!(state.current_turn(), Mark::X);
        assert_eq!(state.winner(), None);
        assert!(!state.is_over());
        assert_eq!(state.legal_moves().len(), 9);
    }

    #[test]
    fn test_from_parts_accepts_valid_states() {
        assert!(GameState::from_parts(board("XO......."), Mark::X, None, false).is_ok());
        assert!(GameState::from_parts(board("XXXOO...."), Mark::X, Some(Mark::X), true).is_ok());
        assert!(GameState::from_parts(board("XOXXOOOXX"), Mark::X, None, true).is_ok());
    }

    #[test]
    fn test_from_parts_rejects_winner_without_game_over() {
        let err = GameState::from_parts(board("XXXOO...."), Mark::X, Some(Mark::X), false);
        assert_eq!(err, Err(StateError::WinnerWithoutGameOver(Mark::X)));
    }

    #[test]
    fn test_from_parts_rejects_over_without_result() {
        let err = GameState::from_parts(board("XO......."), Mark::X, None, true);
        assert_eq!(err, Err(StateError::OverWithoutResult));
    }

    #[test]
    fn test_from_parts_rejects_full_board_in_progress() {
        let err = GameState::from_parts(board("XOXXOOOXX"), Mark::X, None, false);
        assert_eq!(err, Err(StateError::FullBoardNotOver));
    }

    #[test]
    fn test_from_parts_rejects_winner_mismatch() {
        let err = GameState::from_parts(board("XXXOO...."), Mark::X, None, true);
        assert_eq!(
            err,
            Err(StateError::WinnerMismatch { recorded: None, actual: Some(Mark::X) })
        );

        let err = GameState::from_parts(board("XO......."), Mark::X, Some(Mark::O), true);
        assert!(matches!(err, Err(StateError::WinnerMismatch { .. })));
    }

    #[test]
    fn test_legal_moves_empty_when_over() {
        let state = GameState::from_parts(board("XXXOO...."), Mark::X, Some(Mark::X), true).unwrap();
        assert!(state.legal_moves().is_empty());
    }

    #[test]
    fn test_status_lines() {
        let won = GameState::from_parts(board("XXXOO...."), Mark::X, Some(Mark::X), true).unwrap();
        assert_eq!(won.status_for(Mark::O), "X wins!");

        let draw = GameState::from_parts(board("XOXXOOOXX"), Mark::X, None, true).unwrap();
        assert_eq!(draw.status_for(Mark::X), "Draw!");

        let ongoing = GameState::from_parts(board("X........"), Mark::O, None, false).unwrap();
        assert_eq!(ongoing.status_for(Mark::O), "Your turn!");
        assert_eq!(ongoing.status_for(Mark::X), "Player O's turn");
    }
}
