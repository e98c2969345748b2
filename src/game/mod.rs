//! Rules of the game: grid topology and connectivity, pieces, move legality
//! with forced captures, and the per-game state the host drives.

mod clusters;
pub mod grid;
mod piece;
pub mod rules;
mod state;

pub use grid::{Cell, Direction, Grid, Pos, RUN_LENGTH};
pub use piece::{Piece, PieceKind, Player};
pub use rules::JumpState;
pub use state::{Game, MoveOutcome, SavedGame};
