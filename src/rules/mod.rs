//! Rules engine: move application and win/draw detection.
//!
//! Everything here is a pure function of its inputs. Callers get a new
//! `GameState` back or a `MoveError`; a rejected move never changes state.

pub mod engine;

pub use engine::{apply_move, check_winner, is_draw, outcome, reset, GameResult, MoveError};
