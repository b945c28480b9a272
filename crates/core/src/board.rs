//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell can be empty or filled with a piece kind.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom)
//!
//! Placement and line clearing are value operations: they return a new board
//! and leave the input untouched.

use arrayvec::ArrayVec;

use crate::pieces::Tetromino;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Rows removed by a single [`Board::clear_lines`] call, top to bottom
pub type ClearedRows = ArrayVec<u8, { BOARD_HEIGHT as usize }>;

/// Result of a line clear
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearResult {
    /// Board with full rows removed and the remainder shifted down
    pub board: Board,
    pub lines_cleared: u32,
    /// Indices of the removed rows in the input board
    pub rows: ClearedRows,
}

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Build a board from text rows aligned to the bottom edge.
    ///
    /// `.` or a space is empty, any piece letter fills the cell with that kind
    /// and `#` fills it with an arbitrary kind. Missing rows above are empty;
    /// characters past column 9 and rows beyond the board height are ignored.
    ///
    /// ```
    /// use tetris_training_core::Board;
    ///
    /// let board = Board::from_rows(&["##########"]);
    /// assert!(board.is_row_full(19));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let height = BOARD_HEIGHT as usize;
        let skip = rows.len().saturating_sub(height);
        let top = height - (rows.len() - skip);
        for (i, row) in rows.iter().skip(skip).enumerate() {
            let y = (top + i) as i8;
            for (x, ch) in row.chars().take(BOARD_WIDTH as usize).enumerate() {
                let cell = match ch {
                    '.' | ' ' => None,
                    '#' => Some(PieceKind::I),
                    other => PieceKind::from_str(&other.to_string()),
                };
                board.set(x as i8, y, cell);
            }
        }
        board
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y).is_some_and(|row| row.iter().all(|cell| cell.is_some()))
    }

    /// Cells of row `y`, left to right
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= BOARD_HEIGHT as usize {
            return None;
        }
        let start = y * BOARD_WIDTH as usize;
        Some(&self.cells[start..start + BOARD_WIDTH as usize])
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Write the piece's cells into a copy of this board.
    ///
    /// Cells that fall outside the board (including rows above the top edge)
    /// are dropped. Occupancy is not checked; callers validate with
    /// [`crate::collision::collides`] first.
    pub fn place(&self, piece: &Tetromino) -> Board {
        let mut next = *self;
        for (x, y) in piece.cells() {
            next.set(x, y, Some(piece.kind));
        }
        next
    }

    /// Remove every full row and compact the rest toward the bottom.
    ///
    /// Uses a two-pointer scan from the bottom up; the relative order of the
    /// surviving rows is preserved and the top is refilled with empty rows.
    pub fn clear_lines(&self) -> ClearResult {
        let width = BOARD_WIDTH as usize;
        let mut out = Board::new();
        let mut rows = ClearedRows::new();
        let mut write_y = BOARD_HEIGHT as usize;

        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                rows.push(read_y as u8);
                continue;
            }
            write_y -= 1;
            let src = read_y * width;
            let dst = write_y * width;
            out.cells[dst..dst + width].copy_from_slice(&self.cells[src..src + width]);
        }

        rows.reverse();
        ClearResult {
            board: out,
            lines_cleared: rows.len() as u32,
            rows,
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Encode the board as a dense grid: 0 for empty, 1..=7 by piece kind
    pub fn write_u8_grid(&self, out: &mut [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        let width = BOARD_WIDTH as usize;
        for (y, row) in out.iter_mut().enumerate() {
            for (x, value) in row.iter_mut().enumerate() {
                *value = cell_code(self.cells[y * width + x]);
            }
        }
    }
}

/// Dense encoding of a cell: 0 for empty, `index + 1` into [`PieceKind::ALL`]
pub fn cell_code(cell: Cell) -> u8 {
    match cell {
        None => 0,
        Some(kind) => PieceKind::ALL
            .iter()
            .position(|k| *k == kind)
            .map_or(0, |i| i as u8 + 1),
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rotation;

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_from_rows_is_bottom_aligned() {
        let board = Board::from_rows(&["T.........", "##########"]);
        assert_eq!(board.get(0, 18), Some(Some(PieceKind::T)));
        assert!(board.is_row_full(19));
        assert!(!board.is_row_full(18));
        assert_eq!(board.filled_count(), 11);
    }

    #[test]
    fn test_place_does_not_mutate_input() {
        let board = Board::new();
        let piece = Tetromino::at(PieceKind::O, Rotation::North, 0, 18);
        let placed = board.place(&piece);

        assert_eq!(board.filled_count(), 0);
        assert_eq!(placed.filled_count(), 4);
        assert!(placed.is_occupied(0, 18));
        assert!(placed.is_occupied(1, 19));
    }

    #[test]
    fn test_place_clips_cells_above_top() {
        let piece = Tetromino::at(PieceKind::I, Rotation::East, 0, -2);
        let placed = Board::new().place(&piece);
        assert_eq!(placed.filled_count(), 2);
        assert!(placed.is_occupied(0, 0));
        assert!(placed.is_occupied(0, 1));
    }

    #[test]
    fn test_clear_lines_on_empty_board() {
        let result = Board::new().clear_lines();
        assert_eq!(result.lines_cleared, 0);
        assert!(result.rows.is_empty());
        assert_eq!(result.board, Board::new());
    }

    #[test]
    fn test_clear_lines_shifts_rows_down() {
        let board = Board::from_rows(&["..Z.......", "##########", "L........."]);
        let result = board.clear_lines();

        assert_eq!(result.lines_cleared, 1);
        assert_eq!(result.rows.as_slice(), &[18]);
        assert_eq!(result.board.get(2, 18), Some(Some(PieceKind::Z)));
        assert_eq!(result.board.get(0, 19), Some(Some(PieceKind::L)));
        assert_eq!(result.board.filled_count(), 2);
    }

    #[test]
    fn test_clear_non_adjacent_rows() {
        let board = Board::from_rows(&[
            "##########",
            "O.........",
            "##########",
            ".J........",
        ]);
        let result = board.clear_lines();

        assert_eq!(result.lines_cleared, 2);
        assert_eq!(result.rows.as_slice(), &[16, 18]);
        assert_eq!(result.board.get(0, 18), Some(Some(PieceKind::O)));
        assert_eq!(result.board.get(1, 19), Some(Some(PieceKind::J)));
        assert!(result.board.row(17).is_some_and(|r| r.iter().all(|c| c.is_none())));
    }

    #[test]
    fn test_cell_code() {
        assert_eq!(cell_code(None), 0);
        assert_eq!(cell_code(Some(PieceKind::I)), 1);
        assert_eq!(cell_code(Some(PieceKind::Z)), 7);
    }

    #[test]
    fn test_write_u8_grid() {
        let board = Board::from_rows(&["T........O"]);
        let mut grid = [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        board.write_u8_grid(&mut grid);
        assert_eq!(grid[19][0], 3);
        assert_eq!(grid[19][9], 2);
        assert_eq!(grid[18], [0; 10]);
    }
}
