use serde::{Deserialize, Serialize};

use super::clusters::Clusters;
use super::piece::{Piece, PieceKind, Player};
use crate::error::StateError;

pub const RUN_LENGTH: usize = 4;

/// A board coordinate. `x` is the column, `y` the row; row 0 is the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Pos { x, y }
    }

    fn offset(self, dx: isize, dy: isize) -> Option<Pos> {
        Some(Pos {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

/// The eight neighbor directions. F is row-decreasing (toward the top), B is
/// row-increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    N,
    S,
    E,
    W,
    FL,
    FR,
    BL,
    BR,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::S,
        Direction::E,
        Direction::W,
        Direction::FL,
        Direction::FR,
        Direction::BL,
        Direction::BR,
    ];

    pub const DIAGONALS: [Direction; 4] =
        [Direction::FL, Direction::FR, Direction::BL, Direction::BR];

    /// (dx, dy) step for this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::N => (0, -1),
            Direction::S => (0, 1),
            Direction::E => (1, 0),
            Direction::W => (-1, 0),
            Direction::FL => (-1, -1),
            Direction::FR => (1, -1),
            Direction::BL => (-1, 1),
            Direction::BR => (1, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    enabled: bool,
    piece: Option<Piece>,
}

impl Cell {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn piece(&self) -> Option<Piece> {
        self.piece
    }

    /// Owner tag of the cell: the owner of its piece, if any.
    pub fn owner(&self) -> Option<Player> {
        self.piece.map(|p| p.owner())
    }

    pub fn is_empty(&self) -> bool {
        self.piece.is_none()
    }
}

/// Fixed `width x height` board with an enabled mask, at most one piece per
/// cell, and a same-owner connectivity graph kept in step with the pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    clusters: Clusters,
}

impl Grid {
    /// Create an empty grid with every cell enabled.
    pub fn new(width: usize, height: usize) -> Self {
        let len = width * height;
        Grid {
            width,
            height,
            cells: vec![
                Cell {
                    enabled: true,
                    piece: None,
                };
                len
            ],
            clusters: Clusters::new(len),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Linear index of an in-bounds position.
    pub fn index(&self, pos: Pos) -> usize {
        pos.y * self.width + pos.x
    }

    pub fn pos_of(&self, index: usize) -> Pos {
        Pos::new(index % self.width, index / self.width)
    }

    pub fn is_valid(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Bounds-checked enabled test. Out-of-range cells are never enabled.
    pub fn is_enabled(&self, pos: Pos) -> bool {
        self.cell(pos).is_some_and(|c| c.enabled)
    }

    /// Enable or disable a cell. Disabling a cell removes its piece.
    pub fn set_enabled(&mut self, pos: Pos, enabled: bool) {
        if !self.is_valid(pos) {
            return;
        }
        if !enabled {
            self.remove(pos);
        }
        let idx = self.index(pos);
        self.cells[idx].enabled = enabled;
    }

    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        if self.is_valid(pos) {
            Some(&self.cells[self.index(pos)])
        } else {
            None
        }
    }

    pub fn piece_at(&self, pos: Pos) -> Option<Piece> {
        self.cell(pos).and_then(|c| c.piece)
    }

    pub fn owner_at(&self, pos: Pos) -> Option<Player> {
        self.cell(pos).and_then(|c| c.owner())
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.cells.len()).map(move |i| self.pos_of(i))
    }

    /// Enabled positions in row-major order.
    pub fn enabled_positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.positions().filter(move |&p| self.is_enabled(p))
    }

    pub fn enabled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.enabled).count()
    }

    /// The neighboring cell in `dir`, or None past the edge. No wraparound.
    pub fn neighbor(&self, dir: Direction, pos: Pos) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        pos.offset(dx, dy).filter(|&p| self.is_valid(p))
    }

    /// The cell jumped over and the landing cell for a capture in `dir`.
    pub fn jump_target(&self, dir: Direction, pos: Pos) -> Option<(Pos, Pos)> {
        let over = self.neighbor(dir, pos)?;
        let landing = self.neighbor(dir, over)?;
        Some((over, landing))
    }

    /// The up-to-eight in-bounds neighbors of `pos`.
    pub fn surrounding(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbor(dir, pos))
    }

    /// Put a piece on an enabled, empty cell and link it into the graph.
    /// Returns false (and does nothing) otherwise.
    pub fn place(&mut self, pos: Pos, piece: Piece) -> bool {
        if !self.is_enabled(pos) || self.piece_at(pos).is_some() {
            return false;
        }
        let idx = self.index(pos);
        self.cells[idx].piece = Some(piece);
        self.link_same_owner(pos);
        true
    }

    /// Take the piece off a cell, re-deriving the connectivity it was part of.
    pub fn remove(&mut self, pos: Pos) -> Option<Piece> {
        if !self.is_valid(pos) {
            return None;
        }
        let idx = self.index(pos);
        let piece = self.cells[idx].piece.take()?;
        for survivor in self.clusters.detach(idx) {
            let p = self.pos_of(survivor);
            self.link_same_owner(p);
        }
        Some(piece)
    }

    /// Promote the piece at `pos` in place. Returns true if it became a king.
    pub fn promote(&mut self, pos: Pos) -> bool {
        if !self.is_valid(pos) {
            return false;
        }
        let idx = self.index(pos);
        self.cells[idx].piece.as_mut().is_some_and(|p| p.promote())
    }

    /// Link the piece at `pos` to every same-owner 8-neighbor, merging their
    /// clusters into one.
    pub fn link_same_owner(&mut self, pos: Pos) {
        let Some(owner) = self.owner_at(pos) else {
            return;
        };
        let idx = self.index(pos);
        self.clusters.insert(idx);
        let friends: Vec<usize> = self
            .surrounding(pos)
            .filter(|&n| self.is_enabled(n) && self.owner_at(n) == Some(owner))
            .map(|n| self.index(n))
            .collect();
        for n in friends {
            self.clusters.insert(n);
            self.clusters.union(idx, n);
        }
    }

    /// Size of the same-owner cluster containing `pos` (0 if empty).
    pub fn cluster_size(&self, pos: Pos) -> usize {
        if !self.is_valid(pos) {
            return 0;
        }
        self.clusters.component_size(self.index(pos))
    }

    pub fn are_connected(&self, a: Pos, b: Pos) -> bool {
        self.is_valid(a) && self.is_valid(b) && self.clusters.connected(self.index(a), self.index(b))
    }

    /// Scan the row, column and both diagonals through `pos` for a maximal
    /// same-owner run. Returns the first run of at least `RUN_LENGTH` cells.
    pub fn scan_runs(&self, pos: Pos) -> Option<Vec<Pos>> {
        let owner = self.owner_at(pos)?;
        if !self.is_enabled(pos) {
            return None;
        }
        let matches = |p: Pos| self.is_enabled(p) && self.owner_at(p) == Some(owner);

        for (dx, dy) in [(1, 0), (0, 1), (1, 1), (1, -1)] {
            let mut start = pos;
            while let Some(prev) = start.offset(-dx, -dy).filter(|&p| matches(p)) {
                start = prev;
            }
            let mut run = vec![start];
            let mut cur = start;
            while let Some(next) = cur.offset(dx, dy).filter(|&p| matches(p)) {
                run.push(next);
                cur = next;
            }
            if run.len() >= RUN_LENGTH {
                return Some(run);
            }
        }
        None
    }

    /// Lowest empty enabled row of `column`, scanning up from the bottom.
    pub fn landing_row(&self, column: usize) -> Option<usize> {
        if column >= self.width {
            return None;
        }
        (0..self.height).rev().find(|&y| {
            let p = Pos::new(column, y);
            self.is_enabled(p) && self.piece_at(p).is_none()
        })
    }

    /// A column accepts drops while its topmost enabled cell is empty.
    pub fn is_column_open(&self, column: usize) -> bool {
        if column >= self.width {
            return false;
        }
        (0..self.height)
            .map(|y| Pos::new(column, y))
            .find(|&p| self.is_enabled(p))
            .is_some_and(|p| self.piece_at(p).is_none())
    }

    pub fn open_columns(&self) -> Vec<usize> {
        (0..self.width).filter(|&c| self.is_column_open(c)).collect()
    }

    /// Remove every piece. The enabled mask is kept.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.piece = None;
        }
        self.clusters.clear();
    }

    /// One character per enabled cell, row-major: `0` for empty, otherwise
    /// the piece-kind digit.
    pub fn to_state_string(&self) -> String {
        self.cells
            .iter()
            .filter(|c| c.enabled)
            .map(|c| c.piece.map_or('0', |p| p.kind().digit()))
            .collect()
    }

    /// Replace every piece from a state string. The string is validated in
    /// full first; on error the grid is left untouched.
    pub fn from_state_string(&mut self, state: &str) -> Result<(), StateError> {
        let expected = self.enabled_count();
        let actual = state.chars().count();
        if actual != expected {
            return Err(StateError::WrongLength { expected, actual });
        }
        let mut kinds = Vec::with_capacity(expected);
        for (index, ch) in state.chars().enumerate() {
            match ch {
                '0' => kinds.push(None),
                _ => match PieceKind::from_digit(ch) {
                    Some(kind) => kinds.push(Some(kind)),
                    None => return Err(StateError::InvalidDigit { index, ch }),
                },
            }
        }

        self.clear();
        let targets: Vec<Pos> = self.enabled_positions().collect();
        for (pos, kind) in targets.into_iter().zip(kinds) {
            if let Some(kind) = kind {
                self.place(pos, Piece::of_kind(kind));
            }
        }
        Ok(())
    }
}
