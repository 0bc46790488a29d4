//! Game control trait.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::board::{Board, Direction};
use crate::error::GameError;

/// State reported by the game page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Won,
    Ended,
}

impl FromStr for GameStatus {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(GameStatus::Running),
            "won" => Ok(GameStatus::Won),
            "ended" => Ok(GameStatus::Ended),
            other => Err(GameError::UnexpectedValue(format!("game status {:?}", other))),
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameStatus::Running => "running",
            GameStatus::Won => "won",
            GameStatus::Ended => "ended",
        })
    }
}

/// Reads and drives a running game.
#[async_trait]
pub trait GameControl: Send + Sync {
    /// One-time hook installation; run before any other call.
    async fn setup(&self) -> Result<(), GameError>;

    async fn status(&self) -> Result<GameStatus, GameError>;

    async fn score(&self) -> Result<u64, GameError>;

    async fn board(&self) -> Result<Board, GameError>;

    async fn execute_move(&self, direction: Direction) -> Result<(), GameError>;

    async fn restart(&self) -> Result<(), GameError>;

    /// Keep playing after reaching the winning tile.
    async fn continue_game(&self) -> Result<(), GameError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("running".parse::<GameStatus>().unwrap(), GameStatus::Running);
        assert_eq!("won".parse::<GameStatus>().unwrap(), GameStatus::Won);
        assert_eq!("ended".parse::<GameStatus>().unwrap(), GameStatus::Ended);
        assert!("paused".parse::<GameStatus>().is_err());
    }

    #[test]
    fn test_status_display_round_trip() {
        for status in [GameStatus::Running, GameStatus::Won, GameStatus::Ended] {
            assert_eq!(status.to_string().parse::<GameStatus>().unwrap(), status);
        }
    }
}
