//! Board module - manages the game grid
//!
//! The board is a 10x21 grid where each cell is empty or filled with a piece's color.
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..20 (top to bottom).
//! Rows above the board (y < 0) form a spawn buffer: they are never stored and only
//! checked against the horizontal bounds.

use crate::pieces::{Piece, Position};
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
pub const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// The game board - 10 columns x 21 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i16, y: i16) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i16 || y < 0 || y >= BOARD_HEIGHT as i16 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i16, y: i16) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i16, y: i16, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        matches!(self.get(x, y), Some(Cell::Filled(_)))
    }

    /// True if any of the piece's cells at `pos` leaves the side walls, reaches
    /// the floor, or overlaps a filled cell. Cells above the board only check
    /// the side walls.
    pub fn collides(&self, pos: Position, piece: &Piece) -> bool {
        piece.cells_at(pos).any(|(x, y)| {
            if x < 0 || x >= BOARD_WIDTH as i16 || y >= BOARD_HEIGHT as i16 {
                return true;
            }
            y >= 0 && self.is_occupied(x, y)
        })
    }

    /// Write the piece's color into every cell it covers on the board.
    /// Cells above the board are dropped.
    pub fn merge(&mut self, pos: Position, piece: &Piece) {
        let cell = Cell::Filled(piece.kind);
        for (x, y) in piece.cells_at(pos) {
            if y >= 0 {
                self.set(x, y, cell);
            }
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_filled())
    }

    /// Remove a row and shift all rows above it down by one.
    /// The top row becomes empty.
    pub fn clear_row(&mut self, y: usize) {
        if y >= BOARD_HEIGHT as usize {
            return;
        }

        let width = BOARD_WIDTH as usize;

        // copy_within handles the overlapping ranges
        for row in (1..=y).rev() {
            let src_start = (row - 1) * width;
            self.cells
                .copy_within(src_start..src_start + width, row * width);
        }

        self.cells[..width].fill(Cell::Empty);
    }

    /// Clear every full row, scanning bottom to top, and return how many were removed.
    ///
    /// After a row is removed the same index is examined again, since the row
    /// above has just moved into it.
    pub fn clear_full_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = BOARD_HEIGHT as usize;
        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                self.clear_row(row);
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(BOARD_WIDTH as usize)
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Serialize to one byte per cell, row-major
    pub fn to_bytes(&self) -> [u8; BOARD_SIZE] {
        let mut out = [0u8; BOARD_SIZE];
        for (byte, cell) in out.iter_mut().zip(self.cells.iter()) {
            *byte = cell.to_byte();
        }
        out
    }

    /// Inverse of [`Board::to_bytes`]. Returns None on a length mismatch or an
    /// unknown cell byte.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != BOARD_SIZE {
            return None;
        }
        let mut board = Self::new();
        for (cell, &byte) in board.cells.iter_mut().zip(bytes) {
            *cell = Cell::from_byte(byte)?;
        }
        Some(board)
    }

    /// Set every cell of row `y` to `cell`.
    pub fn fill_row(&mut self, y: i16, cell: Cell) {
        for x in 0..BOARD_WIDTH as i16 {
            self.set(x, y, cell);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-mutating form of [`Board::clear_full_lines`]
pub fn clear_full_lines(board: &Board) -> (usize, Board) {
    let mut next = board.clone();
    let count = next.clear_full_lines();
    (count, next)
}
