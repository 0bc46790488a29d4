//! DOM scraping and synthetic key events.
//!
//! Slow and prone to races on a slow browser, but works with most 2048
//! clones since it only relies on the page markup.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use tilebot_protocols::{Board, Direction, GameControl, GameError, GameStatus};

use crate::page::Page;
use crate::parse;
use crate::script::{self, KeyAction};

pub struct KeyboardControl {
    page: Page,
}

impl KeyboardControl {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Status from the message overlay's class names.
    pub(crate) async fn dom_status(page: &Page) -> Result<GameStatus, GameError> {
        parse::parse_status(page.run(script::DOM_STATUS).await?)
    }

    /// Arrow key down, `key_delay`, key up, then `move_delay` to let the
    /// animation settle.
    pub(crate) async fn press_arrow(page: &Page, direction: Direction) -> Result<(), GameError> {
        let key = script::arrow_key(direction);
        let pacing = *page.pacing();
        page.key_event(KeyAction::Down, key).await?;
        tokio::time::sleep(pacing.key_delay).await;
        page.key_event(KeyAction::Up, key).await?;
        tokio::time::sleep(pacing.move_delay).await;
        Ok(())
    }
}

#[async_trait]
impl GameControl for KeyboardControl {
    async fn setup(&self) -> Result<(), GameError> {
        match self.page.run(script::FIND_TILE_CONTAINER).await? {
            Value::Bool(true) => {
                debug!("Found tile container");
                Ok(())
            }
            other => Err(GameError::UnexpectedValue(format!(
                "no tile-container on the page ({})",
                other
            ))),
        }
    }

    async fn status(&self) -> Result<GameStatus, GameError> {
        Self::dom_status(&self.page).await
    }

    async fn score(&self) -> Result<u64, GameError> {
        parse::parse_score(self.page.run(script::DOM_SCORE).await?)
    }

    async fn board(&self) -> Result<Board, GameError> {
        parse::parse_tile_classes(self.page.run(script::DOM_TILES).await?)
    }

    async fn execute_move(&self, direction: Direction) -> Result<(), GameError> {
        Self::press_arrow(&self.page, direction).await
    }

    async fn restart(&self) -> Result<(), GameError> {
        self.page.restart().await
    }

    async fn continue_game(&self) -> Result<(), GameError> {
        self.page.continue_game().await
    }
}
