//! Decoding values scraped from the page.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use tilebot_protocols::board::BOARD_SIZE;
use tilebot_protocols::{Board, GameError, GameStatus};

static TILE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^tile-(\d+)$").expect("tile value pattern is valid"));

static TILE_POSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^tile-position-(\d+)-(\d+)$").expect("tile position pattern is valid")
});

/// Unwrap a value that may have been sent as JSON text.
///
/// Strings that are not valid JSON are returned unchanged.
pub fn decode_json(value: Value) -> Value {
    match value {
        Value::String(text) => match serde_json::from_str(&text) {
            Ok(inner) => inner,
            Err(_) => Value::String(text),
        },
        other => other,
    }
}

pub fn parse_status(value: Value) -> Result<GameStatus, GameError> {
    match decode_json(value) {
        Value::String(status) => status.parse(),
        other => Err(GameError::UnexpectedValue(format!("game status {}", other))),
    }
}

pub fn parse_score(value: Value) -> Result<u64, GameError> {
    let value = decode_json(value);
    if let Some(score) = value.as_u64() {
        return Ok(score);
    }
    match value.as_f64() {
        Some(score) if score >= 0.0 && score.fract() == 0.0 => Ok(score as u64),
        _ => Err(GameError::UnexpectedValue(format!("score {}", value))),
    }
}

fn rank(tile_value: u64) -> Result<u8, GameError> {
    Board::rank_of(tile_value)
        .ok_or_else(|| GameError::BoardParse(format!("{} is not a tile value", tile_value)))
}

fn place(board: &mut Board, row: usize, col: usize, tile_value: u64) -> Result<(), GameError> {
    if row >= BOARD_SIZE || col >= BOARD_SIZE {
        return Err(GameError::BoardParse(format!(
            "tile at row {} column {} is off the board",
            row, col
        )));
    }
    board.set(row, col, rank(tile_value)?);
    Ok(())
}

/// Board from tile class lists such as `"tile tile-8 tile-position-2-3"`.
///
/// Positions are 1-based `x-y`, i.e. column then row. When two tiles share a
/// cell (a merge in progress), the later one wins.
pub fn parse_tile_classes(value: Value) -> Result<Board, GameError> {
    let classes: Vec<String> = serde_json::from_value(decode_json(value))
        .map_err(|e| GameError::BoardParse(format!("tile list: {}", e)))?;

    let mut board = Board::empty();
    for class_list in &classes {
        let mut tile_value = None;
        let mut position = None;
        for class in class_list.split_whitespace() {
            if let Some(caps) = TILE_VALUE.captures(class) {
                tile_value = caps[1].parse::<u64>().ok();
            }
            if let Some(caps) = TILE_POSITION.captures(class) {
                position = caps[1].parse::<usize>().ok().zip(caps[2].parse::<usize>().ok());
            }
        }

        match (tile_value, position) {
            (Some(v), Some((x, y))) if x >= 1 && y >= 1 => place(&mut board, y - 1, x - 1, v)?,
            _ => {
                return Err(GameError::BoardParse(format!(
                    "tile without value or position: {:?}",
                    class_list
                )));
            }
        }
    }
    Ok(board)
}

#[derive(Debug, Deserialize)]
struct GridTile {
    x: usize,
    y: usize,
    value: u64,
}

#[derive(Debug, Deserialize)]
struct Grid {
    cells: Vec<Vec<Option<GridTile>>>,
}

/// Board from the game manager's serialized grid (`cells[x][y]`, 0-based).
pub fn parse_grid(value: Value) -> Result<Board, GameError> {
    let grid: Grid = serde_json::from_value(decode_json(value))
        .map_err(|e| GameError::BoardParse(format!("grid: {}", e)))?;

    let mut board = Board::empty();
    for tile in grid.cells.iter().flatten().flatten() {
        place(&mut board, tile.y, tile.x, tile.value)?;
    }
    Ok(board)
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
