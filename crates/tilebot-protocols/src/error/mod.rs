//! Error types for the tilebot protocol layer.

mod control;
mod game;
mod oracle;

pub use control::*;
pub use game::*;
pub use oracle::*;
