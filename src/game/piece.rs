use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Red,
    Yellow,
}

impl Player {
    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::Red => Player::Yellow,
            Player::Yellow => Player::Red,
        }
    }

    /// Row delta of a plain piece's forward step. Red starts at row 0 and
    /// moves down the board, Yellow moves up.
    pub fn forward(self) -> isize {
        match self {
            Player::Red => 1,
            Player::Yellow => -1,
        }
    }

    /// Row on which this player's plain pieces are promoted.
    pub fn promotion_row(self, height: usize) -> usize {
        match self {
            Player::Red => height - 1,
            Player::Yellow => 0,
        }
    }

    /// Get player name for display
    pub fn name(self) -> &'static str {
        match self {
            Player::Red => "Red",
            Player::Yellow => "Yellow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    RedPlain,
    RedKing,
    YellowPlain,
    YellowKing,
}

impl PieceKind {
    pub fn plain(owner: Player) -> Self {
        match owner {
            Player::Red => PieceKind::RedPlain,
            Player::Yellow => PieceKind::YellowPlain,
        }
    }

    pub fn owner(self) -> Player {
        match self {
            PieceKind::RedPlain | PieceKind::RedKing => Player::Red,
            PieceKind::YellowPlain | PieceKind::YellowKing => Player::Yellow,
        }
    }

    pub fn is_king(self) -> bool {
        matches!(self, PieceKind::RedKing | PieceKind::YellowKing)
    }

    /// Digit used in the serialized board string (`0` is reserved for empty).
    pub fn digit(self) -> char {
        match self {
            PieceKind::RedPlain => '1',
            PieceKind::RedKing => '2',
            PieceKind::YellowPlain => '3',
            PieceKind::YellowKing => '4',
        }
    }

    pub fn from_digit(ch: char) -> Option<Self> {
        match ch {
            '1' => Some(PieceKind::RedPlain),
            '2' => Some(PieceKind::RedKing),
            '3' => Some(PieceKind::YellowPlain),
            '4' => Some(PieceKind::YellowKing),
            _ => None,
        }
    }

    /// Glyph for the ASCII board.
    pub fn glyph(self) -> char {
        match self {
            PieceKind::RedPlain => 'r',
            PieceKind::RedKing => 'R',
            PieceKind::YellowPlain => 'y',
            PieceKind::YellowKing => 'Y',
        }
    }
}

/// A piece on the board. Ownership is fixed for the piece's lifetime; the kind
/// changes at most once, on promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
}

impl Piece {
    pub fn new(owner: Player) -> Self {
        Piece {
            kind: PieceKind::plain(owner),
        }
    }

    pub fn of_kind(kind: PieceKind) -> Self {
        Piece { kind }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn owner(&self) -> Player {
        self.kind.owner()
    }

    pub fn is_king(&self) -> bool {
        self.kind.is_king()
    }

    /// Upgrade a plain piece to a king. Returns false if it already was one.
    pub fn promote(&mut self) -> bool {
        let promoted = match self.kind {
            PieceKind::RedPlain => PieceKind::RedKing,
            PieceKind::YellowPlain => PieceKind::YellowKing,
            PieceKind::RedKing | PieceKind::YellowKing => return false,
        };
        self.kind = promoted;
        true
    }
}
