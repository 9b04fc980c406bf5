//! Core Connect Four game logic: board representation, player types, canonical
//! board keys and the game state machine with immutable transitions.

mod board;
mod key;
mod player;
mod state;

pub use board::{windows, Board, Cell, Window, COLS, CONNECT, DIRECTIONS, ROWS};
pub use key::BoardKey;
pub use player::Player;
pub use state::{GameOutcome, GameState};

/// Legal columns of a position, in ascending order.
pub type LegalActions = Vec<usize>;
