//! Oracle loading errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Couldn't find 2048 library {dir}/2048.{{so,dll,dylib}}! Make sure to build it first.")]
    LibraryNotFound { dir: PathBuf },

    #[error("Failed to load oracle library {path}: {message}")]
    Load { path: PathBuf, message: String },

    #[error("Oracle library is missing symbol `{0}`")]
    MissingSymbol(String),
}
