//! # Tilebot Protocols
//!
//! Interface definitions shared by the tilebot crates.
//! Contains only traits and plain data types; the browser clients, the game
//! controllers and the native oracle live in their own crates.
//!
//! ## Core Traits
//!
//! - [`ScriptExecutor`] - Run a script in a remote browser tab and get its value
//! - [`GameControl`] - Read and drive the state of a running game
//! - [`MoveOracle`] - Score a candidate move for a packed board

pub mod board;
pub mod error;
pub mod executor;
pub mod game;
pub mod oracle;

pub use board::{Board, Direction, PackedBoard};
pub use error::{ControlError, GameError, OracleError};
pub use executor::ScriptExecutor;
pub use game::{GameControl, GameStatus};
pub use oracle::MoveOracle;
