use std::fmt;
use std::str::FromStr;

use super::Piece;
use crate::error::BoardError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Length of a winning run.
const CONNECT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Player,
    Ai,
}

impl Cell {
    /// Numeric code used by `Board::from_rows` (0 empty, 1 player, 2 AI).
    pub fn from_code(code: u8) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Player),
            2 => Some(Cell::Ai),
            _ => None,
        }
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Player => 'P',
            Cell::Ai => 'A',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column is full")]
    ColumnFull,
    #[error("column is out of range")]
    InvalidColumn,
    #[error("game is already over")]
    GameOver,
}

/// A 6x7 Connect Four grid. Row 0 is the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Build a board from numeric rows, bottom row first.
    ///
    /// Rejects wrong dimensions, unknown cell codes and pieces floating
    /// above an empty cell.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, BoardError> {
        if rows.len() != ROWS {
            return Err(BoardError::RowCount {
                expected: ROWS,
                found: rows.len(),
            });
        }

        let mut board = Board::new();
        for (row, values) in rows.iter().enumerate() {
            if values.len() != COLS {
                return Err(BoardError::ColumnCount {
                    row,
                    expected: COLS,
                    found: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                let cell = Cell::from_code(value).ok_or(BoardError::InvalidCell {
                    row,
                    col,
                    value: value.to_string(),
                })?;
                board.cells[row][col] = cell;
            }
        }

        board.check_gravity()?;
        Ok(board)
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// True iff `col` is on the board and its top cell is empty.
    pub fn is_valid_column(&self, col: usize) -> bool {
        col < COLS && self.cells[ROWS - 1][col] == Cell::Empty
    }

    /// Playable columns in ascending order.
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| self.is_valid_column(col)).collect()
    }

    /// First empty row scanning up from the bottom.
    pub fn lowest_open_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).find(|&row| self.cells[row][col] == Cell::Empty)
    }

    /// Set a cell without any validation.
    pub fn place_piece(&mut self, row: usize, col: usize, piece: Piece) {
        self.cells[row][col] = piece.to_cell();
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, piece: Piece) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn);
        }
        let row = self.lowest_open_row(col).ok_or(MoveError::ColumnFull)?;
        self.place_piece(row, col, piece);
        Ok(row)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| !self.is_valid_column(col))
    }

    /// Number of non-empty cells.
    pub fn piece_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell != Cell::Empty)
            .count()
    }

    /// Scan the whole board for four of `piece` in a row.
    pub fn is_winning_position(&self, piece: Piece) -> bool {
        let cell = piece.to_cell();
        self.has_horizontal(cell)
            || self.has_vertical(cell)
            || self.has_diagonal_up(cell)
            || self.has_diagonal_down(cell)
    }

    pub fn winner(&self) -> Option<Piece> {
        [Piece::Player, Piece::Ai]
            .into_iter()
            .find(|&piece| self.is_winning_position(piece))
    }

    /// A board is terminal once either piece has won or no column is open.
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    /// True when no column has an empty cell below a filled one.
    pub fn is_gravity_packed(&self) -> bool {
        self.check_gravity().is_ok()
    }

    pub(crate) fn check_gravity(&self) -> Result<(), BoardError> {
        for col in 0..COLS {
            let mut seen_empty = false;
            for row in 0..ROWS {
                match self.cells[row][col] {
                    Cell::Empty => seen_empty = true,
                    _ if seen_empty => return Err(BoardError::FloatingPiece { row, col }),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn run_from(&self, row: usize, col: usize, d_row: isize, d_col: isize, cell: Cell) -> bool {
        (0..CONNECT as isize).all(|i| {
            let r = row as isize + d_row * i;
            let c = col as isize + d_col * i;
            (0..ROWS as isize).contains(&r)
                && (0..COLS as isize).contains(&c)
                && self.cells[r as usize][c as usize] == cell
        })
    }

    fn has_horizontal(&self, cell: Cell) -> bool {
        (0..ROWS).any(|row| (0..=COLS - CONNECT).any(|col| self.run_from(row, col, 0, 1, cell)))
    }

    fn has_vertical(&self, cell: Cell) -> bool {
        (0..=ROWS - CONNECT).any(|row| (0..COLS).any(|col| self.run_from(row, col, 1, 0, cell)))
    }

    /// Bottom-left to top-right, /
    fn has_diagonal_up(&self, cell: Cell) -> bool {
        (0..=ROWS - CONNECT)
            .any(|row| (0..=COLS - CONNECT).any(|col| self.run_from(row, col, 1, 1, cell)))
    }

    /// Top-left to bottom-right, \
    fn has_diagonal_down(&self, cell: Cell) -> bool {
        (CONNECT - 1..ROWS)
            .any(|row| (0..=COLS - CONNECT).any(|col| self.run_from(row, col, -1, 1, cell)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Top row first, one line per row.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            let line: String = self.cells[row].iter().map(|cell| cell.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Parses six non-blank lines, top row first. Whitespace inside a line is
/// ignored so both `PA..` and `P A . .` are accepted.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().filter(|line| !line.trim().is_empty()).collect();
        if lines.len() != ROWS {
            return Err(BoardError::RowCount {
                expected: ROWS,
                found: lines.len(),
            });
        }

        let mut board = Board::new();
        for (i, line) in lines.iter().enumerate() {
            let row = ROWS - 1 - i;
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != COLS {
                return Err(BoardError::ColumnCount {
                    row,
                    expected: COLS,
                    found: symbols.len(),
                });
            }
            for (col, symbol) in symbols.into_iter().enumerate() {
                board.cells[row][col] = match symbol.to_ascii_uppercase() {
                    '.' | '0' => Cell::Empty,
                    'P' | 'X' | '1' => Cell::Player,
                    'A' | 'O' | '2' => Cell::Ai,
                    other => {
                        return Err(BoardError::InvalidCell {
                            row,
                            col,
                            value: other.to_string(),
                        })
                    }
                };
            }
        }

        board.check_gravity()?;
        Ok(board)
    }
}
