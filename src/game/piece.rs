use super::board::{Board, Cell};

/// The two sides of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Piece {
    Player,
    Ai,
}

impl Piece {
    /// Get the other piece
    pub fn other(self) -> Piece {
        match self {
            Piece::Player => Piece::Ai,
            Piece::Ai => Piece::Player,
        }
    }

    /// Convert piece to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            Piece::Player => Cell::Player,
            Piece::Ai => Cell::Ai,
        }
    }

    /// Get piece name for display
    pub fn name(self) -> &'static str {
        match self {
            Piece::Player => "Player",
            Piece::Ai => "AI",
        }
    }
}

/// Whose turn it is, inferred from how many pieces are on the board.
///
/// `on_even` moves whenever the piece count is even (including the empty
/// board), the other piece moves on odd counts. This only stays correct while
/// every placed piece corresponds to exactly one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnRule {
    on_even: Piece,
}

impl TurnRule {
    pub fn new(on_even: Piece) -> Self {
        TurnRule { on_even }
    }

    /// The rule for a game in which `first` makes the opening move.
    pub fn first_mover(first: Piece) -> Self {
        Self::new(first)
    }

    /// Piece to move for a given number of placed pieces.
    pub fn piece_for_count(self, pieces: usize) -> Piece {
        if pieces % 2 == 0 {
            self.on_even
        } else {
            self.on_even.other()
        }
    }

    /// Piece to move on `board`.
    pub fn piece_to_move(self, board: &Board) -> Piece {
        self.piece_for_count(board.piece_count())
    }
}

/// The AI opens on an empty board.
impl Default for TurnRule {
    fn default() -> Self {
        TurnRule::new(Piece::Ai)
    }
}
