//! Core Connect Four rules: board representation, pieces, the turn-parity
//! rule and a game state machine with immutable transitions.

mod board;
mod piece;
mod state;

pub use board::{Board, Cell, MoveError, COLS, ROWS};
pub use piece::{Piece, TurnRule};
pub use state::{GameOutcome, GameState};
