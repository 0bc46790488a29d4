//! # Tilebot Game
//!
//! Plays 2048 in a browser tab through any [`ScriptExecutor`].
//!
//! - [`KeyboardControl`], [`FastControl`] and [`HybridControl`] read and drive
//!   the page in the three supported ways.
//! - [`NativeOracle`] scores moves with the native search library.
//! - [`Player`] runs the game loop.
//!
//! [`ScriptExecutor`]: tilebot_protocols::ScriptExecutor

pub mod fast;
pub mod hybrid;
pub mod keyboard;
pub mod oracle;
pub mod page;
pub mod parse;
pub mod player;
pub mod script;

#[cfg(test)]
mod testing;

pub use fast::FastControl;
pub use hybrid::HybridControl;
pub use keyboard::KeyboardControl;
pub use oracle::{NativeOracle, find_library};
pub use page::{Page, Pacing};
pub use player::{GameSummary, Player, PlayerSettings, best_direction, find_best_move};
