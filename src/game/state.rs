use super::{Board, MoveError, Piece, TurnRule};
use crate::error::BoardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Piece),
    Draw,
}

/// A game in progress. The piece to move is never stored: it is always
/// derived from the board through the game's `TurnRule`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameState {
    board: Board,
    turn: TurnRule,
    outcome: Option<GameOutcome>,
}

impl GameState {
    /// Create initial game state with `first` to open.
    pub fn new(first: Piece) -> Self {
        GameState {
            board: Board::new(),
            turn: TurnRule::first_mover(first),
            outcome: None,
        }
    }

    /// Resume from an existing position.
    pub fn from_board(board: Board, turn: TurnRule) -> Result<Self, BoardError> {
        board.check_gravity()?;
        Ok(GameState {
            board,
            turn,
            outcome: outcome_of(&board),
        })
    }

    /// Get the piece whose turn it is
    pub fn current_piece(&self) -> Piece {
        self.turn.piece_to_move(&self.board)
    }

    pub fn turn_rule(&self) -> TurnRule {
        self.turn
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Get list of legal columns (not full)
    pub fn legal_columns(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.legal_columns()
    }

    /// Apply a move and return new state (immutable)
    pub fn apply_move(&self, column: usize) -> Result<GameState, MoveError> {
        let mut next = *self;
        next.apply_move_mut(column)?;
        Ok(next)
    }

    /// Apply move mutably (for UI efficiency)
    pub fn apply_move_mut(&mut self, column: usize) -> Result<(), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let piece = self.current_piece();
        self.board.drop_piece(column, piece)?;

        if self.board.is_winning_position(piece) {
            self.outcome = Some(GameOutcome::Winner(piece));
        } else if self.board.is_full() {
            self.outcome = Some(GameOutcome::Draw);
        }

        Ok(())
    }
}

fn outcome_of(board: &Board) -> Option<GameOutcome> {
    match board.winner() {
        Some(piece) => Some(GameOutcome::Winner(piece)),
        None if board.is_full() => Some(GameOutcome::Draw),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;

    #[test]
    fn test_initial_state() {
        let state = GameState::new(Piece::Player);
        assert_eq!(state.current_piece(), Piece::Player);
        assert!(!state.is_terminal());
        assert_eq!(state.legal_columns().len(), 7);
    }

    #[test]
    fn test_apply_move() {
        let state = GameState::new(Piece::Ai);
        let new_state = state.apply_move(3).unwrap();

        assert_eq!(new_state.current_piece(), Piece::Player);
        assert_eq!(new_state.board().get(0, 3), Cell::Ai);
        // Original state is untouched
        assert_eq!(state.board().piece_count(), 0);
    }

    #[test]
    fn test_win_detection() {
        let mut state = GameState::new(Piece::Player);

        // Player builds the bottom row, AI stacks on top of each piece
        for col in 0..4 {
            state = state.apply_move(col).unwrap(); // Player
            if col < 3 {
                state = state.apply_move(col).unwrap(); // AI (row above)
            }
        }

        assert!(state.is_terminal());
        assert_eq!(state.outcome(), Some(GameOutcome::Winner(Piece::Player)));
        assert!(state.legal_columns().is_empty());
        assert_eq!(state.apply_move(5), Err(MoveError::GameOver));
    }

    #[test]
    fn test_draw() {
        // A drawn position with the top of column 0 still open
        let board: Board = "
            .PAAAPP
            AAPPPAA
            PPAAAPP
            AAPPPAA
            PPAAAPP
            AAPPPAA
        "
        .parse()
        .unwrap();
        let state = GameState::from_board(board, TurnRule::default()).unwrap();
        assert_eq!(state.current_piece(), Piece::Player);
        assert!(!state.is_terminal());

        let state = state.apply_move(0).unwrap();
        assert_eq!(state.outcome(), Some(GameOutcome::Draw));
    }

    #[test]
    fn test_from_board_detects_finished_game() {
        let mut board = Board::new();
        for _ in 0..4 {
            board.drop_piece(2, Piece::Ai).unwrap();
        }
        let state = GameState::from_board(board, TurnRule::default()).unwrap();
        assert_eq!(state.outcome(), Some(GameOutcome::Winner(Piece::Ai)));
    }

    #[test]
    fn test_from_board_rejects_floating_piece() {
        let mut board = Board::new();
        board.place_piece(2, 2, Piece::Player);
        assert_eq!(
            GameState::from_board(board, TurnRule::default()),
            Err(BoardError::FloatingPiece { row: 2, col: 2 })
        );
    }

    #[test]
    fn test_column_full_is_reported() {
        let mut state = GameState::new(Piece::Ai);
        // Alternating pieces in one column never connect four
        for _ in 0..6 {
            state.apply_move_mut(0).unwrap();
        }
        assert_eq!(state.apply_move_mut(0), Err(MoveError::ColumnFull));
    }
}
