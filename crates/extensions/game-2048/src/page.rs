//! The game page as seen through a script executor.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, trace};

use tilebot_protocols::{GameError, ScriptExecutor};

use crate::script::{self, KEY_R, KEY_SPACE, KeyAction};

/// Delays between synthetic inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Gap between an arrow key's down and up events.
    pub key_delay: Duration,
    /// Settle time after a keyboard move.
    pub move_delay: Duration,
    /// How long restart and setup keys are held.
    pub key_hold: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            key_delay: Duration::from_millis(10),
            move_delay: Duration::from_millis(50),
            key_hold: Duration::from_millis(100),
        }
    }
}

impl Pacing {
    /// No delays at all.
    pub fn immediate() -> Self {
        Self {
            key_delay: Duration::ZERO,
            move_delay: Duration::ZERO,
            key_hold: Duration::ZERO,
        }
    }
}

/// Shared handle used by every control mode.
#[derive(Clone)]
pub struct Page {
    executor: Arc<dyn ScriptExecutor>,
    pacing: Pacing,
}

impl Page {
    pub fn new(executor: Arc<dyn ScriptExecutor>, pacing: Pacing) -> Self {
        Self { executor, pacing }
    }

    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    /// Evaluate `script` in the page.
    pub async fn run(&self, script: &str) -> Result<Value, GameError> {
        let value = self.executor.execute(script).await?;
        trace!("Page returned {}", value);
        Ok(value)
    }

    pub async fn key_event(&self, action: KeyAction, key: u32) -> Result<(), GameError> {
        self.run(&script::key_event(action, key)).await?;
        Ok(())
    }

    /// Key down, wait `hold`, key up.
    pub async fn press(&self, key: u32, hold: Duration) -> Result<(), GameError> {
        self.key_event(KeyAction::Down, key).await?;
        tokio::time::sleep(hold).await;
        self.key_event(KeyAction::Up, key).await
    }

    /// Start a new game with R, then dismiss any overlay with space.
    pub async fn restart(&self) -> Result<(), GameError> {
        debug!("Restarting game");
        self.press(KEY_R, self.pacing.key_hold).await?;
        self.press(KEY_SPACE, self.pacing.key_hold).await
    }

    /// Click "keep playing" on the win overlay.
    pub async fn continue_game(&self) -> Result<(), GameError> {
        debug!("Continuing after win");
        self.run(script::CONTINUE_GAME).await?;
        Ok(())
    }
}
