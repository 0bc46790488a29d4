//! Test doubles for the page, the oracle and the game.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use tilebot_protocols::{
    Board, ControlError, Direction, GameControl, GameError, GameStatus, MoveOracle, PackedBoard,
    ScriptExecutor,
};

use crate::page::{Page, Pacing};

type Responder = dyn Fn(&str) -> Result<Value, ControlError> + Send + Sync;

/// Records every script and answers with `respond`.
pub struct FakePage {
    scripts: Mutex<Vec<String>>,
    respond: Box<Responder>,
}

impl FakePage {
    pub fn new(
        respond: impl Fn(&str) -> Result<Value, ControlError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    /// Answers every script with null.
    pub fn null() -> Arc<Self> {
        Self::new(|_| Ok(Value::Null))
    }

    pub fn page(self: &Arc<Self>) -> Page {
        Page::new(self.clone(), Pacing::immediate())
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().clone()
    }
}

#[async_trait]
impl ScriptExecutor for FakePage {
    async fn execute(&self, script: &str) -> Result<Value, ControlError> {
        self.scripts.lock().push(script.to_string());
        (self.respond)(script)
    }
}

/// Fixed score per direction.
pub struct FakeOracle {
    pub scores: [f32; 4],
    pub calls: Mutex<Vec<(PackedBoard, Direction)>>,
}

impl FakeOracle {
    pub fn new(scores: [f32; 4]) -> Arc<Self> {
        Arc::new(Self {
            scores,
            calls: Mutex::new(Vec::new()),
        })
    }
}

impl MoveOracle for FakeOracle {
    fn score_move(&self, board: PackedBoard, direction: Direction) -> f32 {
        self.calls.lock().push((board, direction));
        self.scores[direction.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCall {
    Setup,
    Restart,
    Continue,
    Move(Direction),
}

/// Replays a list of statuses, one per `status()` call. Once the list runs
/// out the game reports `Ended`.
pub struct ScriptedGame {
    statuses: Mutex<VecDeque<GameStatus>>,
    board: Board,
    score: Mutex<u64>,
    pub calls: Mutex<Vec<GameCall>>,
}

impl ScriptedGame {
    pub fn new(statuses: &[GameStatus], board: Board) -> Arc<Self> {
        Arc::new(Self {
            statuses: Mutex::new(statuses.iter().copied().collect()),
            board,
            score: Mutex::new(0),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<GameCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl GameControl for ScriptedGame {
    async fn setup(&self) -> Result<(), GameError> {
        self.calls.lock().push(GameCall::Setup);
        Ok(())
    }

    async fn status(&self) -> Result<GameStatus, GameError> {
        Ok(self.statuses.lock().pop_front().unwrap_or(GameStatus::Ended))
    }

    async fn score(&self) -> Result<u64, GameError> {
        Ok(*self.score.lock())
    }

    async fn board(&self) -> Result<Board, GameError> {
        Ok(self.board)
    }

    async fn execute_move(&self, direction: Direction) -> Result<(), GameError> {
        self.calls.lock().push(GameCall::Move(direction));
        *self.score.lock() += 4;
        Ok(())
    }

    async fn restart(&self) -> Result<(), GameError> {
        self.calls.lock().push(GameCall::Restart);
        Ok(())
    }

    async fn continue_game(&self) -> Result<(), GameError> {
        self.calls.lock().push(GameCall::Continue);
        Ok(())
    }
}
