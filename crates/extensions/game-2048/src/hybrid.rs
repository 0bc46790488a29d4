//! Manager reads with keyboard moves.
//!
//! Reads the board and score from the captured `GameManager`, but moves with
//! real key events so the page animates and records them normally.

use async_trait::async_trait;

use tilebot_protocols::{Board, Direction, GameControl, GameError, GameStatus};

use crate::fast::FastControl;
use crate::keyboard::KeyboardControl;
use crate::page::Page;

pub struct HybridControl {
    page: Page,
}

impl HybridControl {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }
}

#[async_trait]
impl GameControl for HybridControl {
    async fn setup(&self) -> Result<(), GameError> {
        FastControl::capture_manager(&self.page).await
    }

    async fn status(&self) -> Result<GameStatus, GameError> {
        KeyboardControl::dom_status(&self.page).await
    }

    async fn score(&self) -> Result<u64, GameError> {
        FastControl::manager_score(&self.page).await
    }

    async fn board(&self) -> Result<Board, GameError> {
        FastControl::manager_board(&self.page).await
    }

    async fn execute_move(&self, direction: Direction) -> Result<(), GameError> {
        KeyboardControl::press_arrow(&self.page, direction).await
    }

    async fn restart(&self) -> Result<(), GameError> {
        self.page.restart().await
    }

    async fn continue_game(&self) -> Result<(), GameError> {
        self.page.continue_game().await
    }
}
