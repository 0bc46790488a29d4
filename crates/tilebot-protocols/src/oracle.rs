//! Move oracle trait.

use crate::board::{Direction, PackedBoard};

/// External move-search oracle.
///
/// Implementations are called from blocking worker threads, one call per
/// candidate direction, so they must be safe to share.
pub trait MoveOracle: Send + Sync {
    /// Desirability of playing `direction` on `board`. A score of 0 means
    /// the move is not possible.
    fn score_move(&self, board: PackedBoard, direction: Direction) -> f32;
}
