use serde::{Deserialize, Serialize};

use super::grid::{Grid, Pos};
use super::piece::{Piece, Player};
use super::rules::{self, JumpState};
use crate::ai::Agent;
use crate::config::BoardConfig;
use crate::error::{GameError, MoveError, StateError};

/// What a checkers-style move did, for the host to animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub captured: Option<Pos>,
    pub promoted: bool,
    /// The same piece must capture again before the turn ends.
    pub continues: bool,
}

/// Serializable snapshot of a game in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub width: usize,
    pub height: usize,
    pub state: String,
    pub current_player: Player,
    pub turn: u32,
    pub red_remaining: u32,
    pub yellow_remaining: u32,
    #[serde(default)]
    pub jump: JumpState,
    /// Cell the win check probes; absent in snapshots taken before any move.
    #[serde(default)]
    pub last_placed: Option<Pos>,
}

/// One game: the grid plus the per-turn bookkeeping the rules need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    grid: Grid,
    pieces_per_side: u32,
    current_player: Player,
    turn: u32,
    red_remaining: u32,
    yellow_remaining: u32,
    jump: JumpState,
    last_placed: Option<Pos>,
}

impl Game {
    /// Set up an empty board. Red moves first.
    pub fn new(config: &BoardConfig) -> Self {
        let mut grid = Grid::new(config.width, config.height);
        for &[x, y] in &config.disabled {
            grid.set_enabled(Pos::new(x, y), false);
        }
        Game {
            grid,
            pieces_per_side: config.pieces_per_side,
            current_player: Player::Red,
            turn: 0,
            red_remaining: config.pieces_per_side,
            yellow_remaining: config.pieces_per_side,
            jump: JumpState::Free,
            last_placed: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Number of completed turns.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn jump_state(&self) -> JumpState {
        self.jump
    }

    pub fn last_placed(&self) -> Option<Pos> {
        self.last_placed
    }

    /// Pieces `player` still has to play.
    pub fn remaining(&self, player: Player) -> u32 {
        match player {
            Player::Red => self.red_remaining,
            Player::Yellow => self.yellow_remaining,
        }
    }

    fn remaining_mut(&mut self, player: Player) -> &mut u32 {
        match player {
            Player::Red => &mut self.red_remaining,
            Player::Yellow => &mut self.yellow_remaining,
        }
    }

    fn end_turn(&mut self) {
        self.jump = JumpState::Free;
        self.current_player = self.current_player.other();
        self.turn += 1;
    }

    /// Hand the turn to the other player without moving. Turn order belongs to
    /// the host; this is its hook for skipping a side.
    pub fn pass_turn(&mut self) {
        self.end_turn();
    }

    /// Drop-mode entry from a clicked cell. Only top-row cells are accepted;
    /// the piece then falls down that cell's column.
    pub fn attempt_placement(&mut self, cell: Pos) -> Result<Pos, MoveError> {
        if cell.y != 0 {
            return Err(MoveError::NotTopRow(cell.y));
        }
        self.drop_in_column(cell.x)
    }

    /// Drop a new piece for the player to move into `column`. Returns where it
    /// landed.
    pub fn drop_in_column(&mut self, column: usize) -> Result<Pos, MoveError> {
        if column >= self.grid.width() {
            return Err(MoveError::InvalidColumn(column));
        }
        if let JumpState::Continue(from) = self.jump {
            return Err(MoveError::MustContinueJumping(from));
        }
        if !self.grid.is_column_open(column) {
            return Err(MoveError::ColumnFull(column));
        }
        let player = self.current_player;
        if self.remaining(player) == 0 {
            return Err(MoveError::NoPiecesLeft(player));
        }
        let row = self
            .grid
            .landing_row(column)
            .ok_or(MoveError::ColumnFull(column))?;
        let pos = Pos::new(column, row);
        if !self.grid.place(pos, Piece::new(player)) {
            return Err(MoveError::ColumnFull(column));
        }

        *self.remaining_mut(player) -= 1;
        self.last_placed = Some(pos);
        self.end_turn();
        Ok(pos)
    }

    pub fn can_leave(&self, source: Pos) -> bool {
        rules::can_leave(&self.grid, self.jump, self.current_player, source)
    }

    pub fn can_move(&self, source: Pos, destination: Pos) -> bool {
        rules::can_move(&self.grid, self.jump, self.current_player, source, destination)
    }

    /// Every legal checkers move for the player to move.
    pub fn legal_moves(&self) -> Vec<(Pos, Pos)> {
        rules::legal_moves(&self.grid, self.jump, self.current_player)
    }

    /// Make a checkers move. A capture removes the jumped piece; reaching the
    /// far row promotes. If the capturing piece can capture again the turn
    /// stays with the same player and only that piece may move next.
    pub fn apply(&mut self, source: Pos, destination: Pos) -> Result<MoveOutcome, MoveError> {
        if !self.can_move(source, destination) {
            return Err(MoveError::IllegalMove {
                from: source,
                to: destination,
            });
        }
        let captured = rules::captured_cell(&self.grid, source, destination);
        let piece = self
            .grid
            .remove(source)
            .ok_or(MoveError::IllegalMove {
                from: source,
                to: destination,
            })?;
        self.grid.place(destination, piece);

        if let Some(over) = captured {
            if let Some(taken) = self.grid.remove(over) {
                let left = self.remaining_mut(taken.owner());
                *left = left.saturating_sub(1);
            }
        }

        let promoted = destination.y == piece.owner().promotion_row(self.grid.height())
            && self.grid.promote(destination);
        self.last_placed = Some(destination);

        let continues = captured.is_some() && rules::can_jump_from(&self.grid, destination);
        if continues {
            self.jump = JumpState::Continue(destination);
        } else {
            self.end_turn();
        }

        Ok(MoveOutcome {
            captured,
            promoted,
            continues,
        })
    }

    /// The winner, if the most recently placed piece completed a run of four.
    ///
    /// Fails with [`GameError::NothingPlaced`] until a piece has been dropped
    /// or moved since setup, [`Game::reset`] or [`Game::load_state_string`].
    /// A bare state string carries no last move to probe.
    pub fn check_for_winner(&self) -> Result<Option<Player>, GameError> {
        let probe = self.last_placed.ok_or(GameError::NothingPlaced)?;
        Ok(self
            .grid
            .scan_runs(probe)
            .and_then(|_| self.grid.owner_at(probe)))
    }

    /// Both sides are out of pieces and nobody has won. Fails like
    /// [`Game::check_for_winner`] when there is nothing to probe.
    pub fn check_for_draw(&self) -> Result<bool, GameError> {
        let winner = self.check_for_winner()?;
        Ok(self.red_remaining == 0 && self.yellow_remaining == 0 && winner.is_none())
    }

    /// Ask `agent` for a column and commit it through the normal drop path.
    pub fn request_ai_move<A: Agent + ?Sized>(&mut self, agent: &mut A) -> Result<Pos, MoveError> {
        let column = agent.select_column(self).ok_or(MoveError::NoOpenColumn)?;
        self.drop_in_column(column)
    }

    /// Clear the board and restore the starting allotment. Red moves next.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.jump = JumpState::Free;
        self.red_remaining = self.pieces_per_side;
        self.yellow_remaining = self.pieces_per_side;
        self.current_player = Player::Red;
        self.turn = 0;
        self.last_placed = None;
    }

    pub fn state_string(&self) -> String {
        self.grid.to_state_string()
    }

    /// Load pieces from a state string. Remaining counts become the allotment
    /// minus each side's pieces on the board. On error nothing changes.
    pub fn load_state_string(&mut self, state: &str) -> Result<(), StateError> {
        self.grid.from_state_string(state)?;
        let on_board = |player: Player| {
            self.grid
                .positions()
                .filter(|&p| self.grid.owner_at(p) == Some(player))
                .count() as u32
        };
        let red = on_board(Player::Red);
        let yellow = on_board(Player::Yellow);
        self.red_remaining = self.pieces_per_side.saturating_sub(red);
        self.yellow_remaining = self.pieces_per_side.saturating_sub(yellow);
        self.jump = JumpState::Free;
        self.last_placed = None;
        Ok(())
    }

    pub fn save(&self) -> SavedGame {
        SavedGame {
            width: self.grid.width(),
            height: self.grid.height(),
            state: self.state_string(),
            current_player: self.current_player,
            turn: self.turn,
            red_remaining: self.red_remaining,
            yellow_remaining: self.yellow_remaining,
            jump: self.jump,
            last_placed: self.last_placed,
        }
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string_pretty(&self.save())?)
    }

    /// Rebuild a game from a snapshot taken on a board set up with `config`.
    /// A saved capture chain is only resumed if its piece belongs to the player
    /// to move and can still capture; otherwise the turn starts free.
    pub fn restore(config: &BoardConfig, saved: &SavedGame) -> Result<Game, GameError> {
        if saved.width != config.width || saved.height != config.height {
            return Err(GameError::BoardMismatch {
                saved_width: saved.width,
                saved_height: saved.height,
                width: config.width,
                height: config.height,
            });
        }
        let mut game = Game::new(config);
        game.load_state_string(&saved.state)?;
        game.current_player = saved.current_player;
        game.turn = saved.turn;
        game.red_remaining = saved.red_remaining;
        game.yellow_remaining = saved.yellow_remaining;
        game.last_placed = saved
            .last_placed
            .filter(|&p| game.grid.piece_at(p).is_some());
        if let JumpState::Continue(from) = saved.jump {
            if game.grid.owner_at(from) == Some(saved.current_player)
                && rules::can_jump_from(&game.grid, from)
            {
                game.jump = saved.jump;
                game.last_placed = Some(from);
            }
        }
        Ok(game)
    }

    pub fn from_json(config: &BoardConfig, json: &str) -> Result<Game, GameError> {
        let saved: SavedGame = serde_json::from_str(json)?;
        Self::restore(config, &saved)
    }

    /// ASCII picture of the board, top row first.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                let pos = Pos::new(x, y);
                let ch = if !self.grid.is_enabled(pos) {
                    '#'
                } else {
                    self.grid.piece_at(pos).map_or('.', |p| p.kind().glyph())
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new(&BoardConfig::default())
    }
}
