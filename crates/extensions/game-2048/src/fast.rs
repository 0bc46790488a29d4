//! Control through the page's `GameManager` instance.
//!
//! Faster and safer than key events, but tied to the original game's
//! internals.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use tilebot_protocols::{Board, Direction, GameControl, GameError, GameStatus};

use crate::page::Page;
use crate::parse;
use crate::script::{self, KEY_UP};

pub struct FastControl {
    page: Page,
}

impl FastControl {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Capture `GameManager._instance` by hooking `isGameTerminated` and
    /// sending one Up key through it.
    pub(crate) async fn capture_manager(page: &Page) -> Result<(), GameError> {
        page.run(script::HOOK_MANAGER).await?;
        let pressed = page.press(KEY_UP, page.pacing().key_hold).await;
        // The hook must come off even if the key press failed.
        page.run(script::UNHOOK_MANAGER).await?;
        pressed?;

        match page.run(script::MANAGER_CAPTURED).await? {
            Value::Bool(true) => {
                debug!("Captured game manager");
                Ok(())
            }
            other => Err(GameError::UnexpectedValue(format!(
                "game manager was not captured ({})",
                other
            ))),
        }
    }

    pub(crate) async fn manager_score(page: &Page) -> Result<u64, GameError> {
        parse::parse_score(page.run(script::MANAGER_SCORE).await?)
    }

    pub(crate) async fn manager_board(page: &Page) -> Result<Board, GameError> {
        parse::parse_grid(page.run(script::MANAGER_GRID).await?)
    }
}

#[async_trait]
impl GameControl for FastControl {
    async fn setup(&self) -> Result<(), GameError> {
        Self::capture_manager(&self.page).await
    }

    async fn status(&self) -> Result<GameStatus, GameError> {
        parse::parse_status(self.page.run(script::MANAGER_STATUS).await?)
    }

    async fn score(&self) -> Result<u64, GameError> {
        Self::manager_score(&self.page).await
    }

    async fn board(&self) -> Result<Board, GameError> {
        Self::manager_board(&self.page).await
    }

    async fn execute_move(&self, direction: Direction) -> Result<(), GameError> {
        self.page.run(&script::manager_move(direction)).await?;
        Ok(())
    }

    async fn restart(&self) -> Result<(), GameError> {
        self.page.restart().await
    }

    async fn continue_game(&self) -> Result<(), GameError> {
        self.page.continue_game().await
    }
}
