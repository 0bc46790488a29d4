//! Board model and packed board encoding.
//!
//! A board is a 4x4 grid of log2 tile values (0 = empty cell). The oracle
//! consumes it packed into a 64-bit word: sixteen 4-bit nibbles in row-major
//! order, cell (0, 0) in the least significant nibble.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Board side length.
pub const BOARD_SIZE: usize = 4;

/// Largest log2 value a nibble can hold (tile 32768).
pub const MAX_RANK: u8 = 15;

/// A board packed into sixteen nibbles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PackedBoard(pub u64);

/// Move direction, in the oracle's Up/Down/Left/Right order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    /// All directions in oracle order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Oracle index (0..3).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 4x4 grid of log2 tile values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [[u8; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Create a board from log2 values. Entries must be in `0..=15`.
    pub fn new(cells: [[u8; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[[u8; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, rank: u8) {
        self.cells[row][col] = rank;
    }

    /// Pack into the oracle's nibble format.
    pub fn pack(&self) -> PackedBoard {
        let mut packed = 0u64;
        for (i, rank) in self.cells.iter().flatten().enumerate() {
            packed |= u64::from(rank & 0xF) << (4 * i);
        }
        PackedBoard(packed)
    }

    /// Inverse of [`Board::pack`].
    pub fn unpack(packed: PackedBoard) -> Self {
        let mut cells = [[0u8; BOARD_SIZE]; BOARD_SIZE];
        for (i, cell) in cells.iter_mut().flatten().enumerate() {
            *cell = ((packed.0 >> (4 * i)) & 0xF) as u8;
        }
        Self { cells }
    }

    /// Log2 of a tile value; `None` unless the value is a power of two
    /// that fits in a nibble.
    pub fn rank_of(tile_value: u64) -> Option<u8> {
        if tile_value < 2 || !tile_value.is_power_of_two() {
            return None;
        }
        let rank = tile_value.trailing_zeros() as u8;
        (rank <= MAX_RANK).then_some(rank)
    }

    /// Tile value of a log2 entry (0 stays 0).
    pub fn tile_value(rank: u8) -> u32 {
        if rank == 0 { 0 } else { 1u32 << rank }
    }

    /// Grid of tile values.
    pub fn values(&self) -> [[u32; BOARD_SIZE]; BOARD_SIZE] {
        self.cells.map(|row| row.map(Self::tile_value))
    }

    /// Largest tile on the board.
    pub fn max_tile(&self) -> u32 {
        self.cells
            .iter()
            .flatten()
            .map(|&rank| Self::tile_value(rank))
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.values() {
            for value in row {
                write!(f, "{:>8} ", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod tests;
