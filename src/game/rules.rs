//! Move legality for the checkers half of the game.
//!
//! Every query here is a total function over the grid, the player to move and
//! an explicit [`JumpState`]; none of them mutate anything.

use serde::{Deserialize, Serialize};

use super::grid::{Direction, Grid, Pos};
use super::piece::{Piece, Player};

/// Forced-jump state of the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpState {
    /// No capture chain is in progress.
    #[default]
    Free,
    /// The piece now standing on this cell must make the next capture.
    Continue(Pos),
}

impl JumpState {
    pub fn is_chaining(self) -> bool {
        matches!(self, JumpState::Continue(_))
    }
}

const DOWN_DIAGONALS: [Direction; 2] = [Direction::BL, Direction::BR];
const UP_DIAGONALS: [Direction; 2] = [Direction::FL, Direction::FR];

/// Diagonals a piece may step or jump along. Plain pieces only go the way
/// their owner's [`Player::forward`] points.
pub fn move_directions(piece: Piece) -> &'static [Direction] {
    if piece.is_king() {
        return &Direction::DIAGONALS;
    }
    if piece.owner().forward() > 0 {
        &DOWN_DIAGONALS
    } else {
        &UP_DIAGONALS
    }
}

fn is_open(grid: &Grid, pos: Pos) -> bool {
    grid.is_enabled(pos) && grid.piece_at(pos).is_none()
}

fn holds_opponent(grid: &Grid, pos: Pos, player: Player) -> bool {
    grid.is_enabled(pos) && grid.owner_at(pos).is_some_and(|o| o != player)
}

/// Cells the piece at `source` can capture into.
pub fn jump_destinations(grid: &Grid, source: Pos) -> Vec<Pos> {
    let Some(piece) = grid.piece_at(source) else {
        return Vec::new();
    };
    move_directions(piece)
        .iter()
        .filter_map(|&dir| grid.jump_target(dir, source))
        .filter(|&(over, landing)| {
            holds_opponent(grid, over, piece.owner()) && is_open(grid, landing)
        })
        .map(|(_, landing)| landing)
        .collect()
}

/// Cells the piece at `source` can step into without capturing.
pub fn step_destinations(grid: &Grid, source: Pos) -> Vec<Pos> {
    let Some(piece) = grid.piece_at(source) else {
        return Vec::new();
    };
    move_directions(piece)
        .iter()
        .filter_map(|&dir| grid.neighbor(dir, source))
        .filter(|&p| is_open(grid, p))
        .collect()
}

pub fn can_jump_from(grid: &Grid, source: Pos) -> bool {
    !jump_destinations(grid, source).is_empty()
}

/// Whether any of `player`'s pieces has a capture available.
pub fn has_jump_available(grid: &Grid, player: Player) -> bool {
    grid.enabled_positions()
        .any(|p| grid.owner_at(p) == Some(player) && can_jump_from(grid, p))
}

/// The cell captured by moving from `source` to `destination`, if that move
/// is a jump over an opposing piece.
pub fn captured_cell(grid: &Grid, source: Pos, destination: Pos) -> Option<Pos> {
    let piece = grid.piece_at(source)?;
    move_directions(piece)
        .iter()
        .filter_map(|&dir| grid.jump_target(dir, source))
        .find(|&(over, landing)| {
            landing == destination && holds_opponent(grid, over, piece.owner())
        })
        .map(|(over, _)| over)
}

/// Whether `player` may pick up the piece on `source`.
///
/// Captures are mandatory: while any capture exists, only pieces that can
/// capture may leave. During a chain, only the chaining piece may.
pub fn can_leave(grid: &Grid, jump: JumpState, player: Player, source: Pos) -> bool {
    let Some(piece) = grid.piece_at(source) else {
        return false;
    };
    if piece.owner() != player || !grid.is_enabled(source) {
        return false;
    }
    if let JumpState::Continue(from) = jump {
        return from == source && can_jump_from(grid, source);
    }
    if has_jump_available(grid, player) {
        return can_jump_from(grid, source);
    }
    true
}

/// Whether `player` may move the piece on `source` to `destination`.
pub fn can_move(
    grid: &Grid,
    jump: JumpState,
    player: Player,
    source: Pos,
    destination: Pos,
) -> bool {
    if !can_leave(grid, jump, player, source) || !is_open(grid, destination) {
        return false;
    }
    let capture_turn = jump.is_chaining() || has_jump_available(grid, player);
    if capture_turn {
        jump_destinations(grid, source).contains(&destination)
    } else {
        step_destinations(grid, source).contains(&destination)
    }
}

/// Every legal (source, destination) pair for `player`.
pub fn legal_moves(grid: &Grid, jump: JumpState, player: Player) -> Vec<(Pos, Pos)> {
    let capture_turn = jump.is_chaining() || has_jump_available(grid, player);
    grid.enabled_positions()
        .filter(|&p| can_leave(grid, jump, player, p))
        .flat_map(|src| {
            let dests = if capture_turn {
                jump_destinations(grid, src)
            } else {
                step_destinations(grid, src)
            };
            dests.into_iter().map(move |dst| (src, dst))
        })
        .collect()
}
