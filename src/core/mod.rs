//! Core types: marks, the board, game state, clocks, room-code RNG, configuration.
//!
//! Nothing in here performs I/O. The rules engine, the replicated store and
//! the sync loop all build on these types.

pub mod mark;
pub mod board;
pub mod state;
pub mod clock;
pub mod rng;
pub mod config;

pub use mark::Mark;
pub use board::{Board, CELL_COUNT, LINES};
pub use state::{GameState, StateError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use rng::{RoomCodeRng, ROOM_CODE_ALPHABET};
pub use config::{SyncConfig, MIN_ROOM_CODE_LEN};
