//! The play loop: read the board, ask the oracle, make the move.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::{JoinError, spawn_blocking};
use tracing::{debug, info};

use tilebot_protocols::{Board, Direction, GameControl, GameError, GameStatus, MoveOracle};

#[derive(Debug, Clone)]
pub struct PlayerSettings {
    /// Score each direction on its own blocking worker.
    pub multithread: bool,
    /// Pause before dismissing the win overlay.
    pub won_pause: Duration,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            multithread: true,
            won_pause: Duration::from_millis(750),
        }
    }
}

/// Outcome of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub moves: u64,
    pub score: u64,
    pub max_tile: u32,
}

/// Highest scoring direction, the earliest one on ties.
///
/// NaN scores are ignored. Returns `None` when no move scores above zero,
/// which means no move is possible.
pub fn best_direction(scores: [f32; 4]) -> Option<Direction> {
    let mut best: Option<(Direction, f32)> = None;
    for (direction, score) in Direction::ALL.into_iter().zip(scores) {
        if score.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((direction, score));
        }
    }
    best.filter(|&(_, score)| score > 0.0)
        .map(|(direction, _)| direction)
}

fn worker_failed(e: JoinError) -> GameError {
    GameError::Oracle(e.to_string())
}

/// Score all four directions off the async runtime and pick the best.
pub async fn find_best_move(
    oracle: &Arc<dyn MoveOracle>,
    board: &Board,
    multithread: bool,
) -> Result<Option<Direction>, GameError> {
    let packed = board.pack();
    let mut scores = [0.0f32; 4];

    if multithread {
        let workers: Vec<_> = Direction::ALL
            .into_iter()
            .map(|direction| {
                let oracle = Arc::clone(oracle);
                spawn_blocking(move || oracle.score_move(packed, direction))
            })
            .collect();
        for (slot, worker) in scores.iter_mut().zip(workers) {
            *slot = worker.await.map_err(worker_failed)?;
        }
    } else {
        let oracle = Arc::clone(oracle);
        scores = spawn_blocking(move || Direction::ALL.map(|d| oracle.score_move(packed, d)))
            .await
            .map_err(worker_failed)?;
    }

    debug!("Move scores {:?}", scores);
    Ok(best_direction(scores))
}

/// Plays one game to the end.
pub struct Player {
    game: Arc<dyn GameControl>,
    oracle: Arc<dyn MoveOracle>,
    settings: PlayerSettings,
}

impl Player {
    pub fn new(
        game: Arc<dyn GameControl>,
        oracle: Arc<dyn MoveOracle>,
        settings: PlayerSettings,
    ) -> Self {
        Self {
            game,
            oracle,
            settings,
        }
    }

    /// Set up the control, start a fresh game if the last one ended, then play.
    pub async fn run(&self) -> Result<GameSummary, GameError> {
        self.game.setup().await?;
        if self.game.status().await? == GameStatus::Ended {
            info!("Previous game has ended, restarting");
            self.game.restart().await?;
        }
        self.play().await
    }

    pub async fn play(&self) -> Result<GameSummary, GameError> {
        let start = Instant::now();
        let mut moves = 0u64;

        loop {
            match self.game.status().await? {
                GameStatus::Ended => break,
                GameStatus::Won => {
                    tokio::time::sleep(self.settings.won_pause).await;
                    self.game.continue_game().await?;
                }
                GameStatus::Running => {}
            }

            let board = self.game.board().await?;
            debug!("Board:\n{}", board);
            let Some(direction) =
                find_best_move(&self.oracle, &board, self.settings.multithread).await?
            else {
                break;
            };

            moves += 1;
            let score = self.game.score().await?;
            info!(
                "{:010.6}: Score {}, Move {}: {}",
                start.elapsed().as_secs_f64(),
                score,
                moves,
                direction
            );
            self.game.execute_move(direction).await?;
        }

        let score = self.game.score().await?;
        let max_tile = self.game.board().await?.max_tile();
        info!("Game over. Final score {}; highest tile {}.", score, max_tile);

        Ok(GameSummary {
            moves,
            score,
            max_tile,
        })
    }
}

#[cfg(test)]
#[path = "player_tests.rs"]
mod tests;
