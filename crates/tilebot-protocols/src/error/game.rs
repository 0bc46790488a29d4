//! Game control errors.

use thiserror::Error;

use super::ControlError;

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Control(#[from] ControlError),

    #[error("Could not parse board: {0}")]
    BoardParse(String),

    #[error("Unexpected value from page: {0}")]
    UnexpectedValue(String),

    /// A scoring worker died before returning a score.
    #[error("Oracle worker failed: {0}")]
    Oracle(String),
}
