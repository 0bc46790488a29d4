//! Scripts evaluated in the game page.
//!
//! Every script is a single expression so its value comes back from any of
//! the browser clients. Structured results are returned as JSON text, since
//! some debuggers hand back object references instead of values. No script
//! contains `//` comments: the remote control client joins lines with spaces.

use tilebot_protocols::Direction;

pub const KEY_LEFT: u32 = 37;
pub const KEY_UP: u32 = 38;
pub const KEY_RIGHT: u32 = 39;
pub const KEY_DOWN: u32 = 40;
pub const KEY_R: u32 = 82;
pub const KEY_SPACE: u32 = 32;

/// Arrow key for a move.
pub fn arrow_key(direction: Direction) -> u32 {
    match direction {
        Direction::Up => KEY_UP,
        Direction::Down => KEY_DOWN,
        Direction::Left => KEY_LEFT,
        Direction::Right => KEY_RIGHT,
    }
}

/// `GameManager.move` argument for each direction; the game orders them Up, Right, Down, Left.
pub const MANAGER_MOVE_ORDER: [u32; 4] = [0, 2, 3, 1];

/// Keyboard event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

impl KeyAction {
    pub fn event_name(self) -> &'static str {
        match self {
            KeyAction::Down => "keydown",
            KeyAction::Up => "keyup",
        }
    }
}

/// Dispatch a synthetic key event on the document body.
///
/// Uses generic events with `keyCode` set by hand, which Chrome accepts
/// where it ignores `keyCode` on a `KeyboardEvent`.
pub fn key_event(action: KeyAction, key: u32) -> String {
    let event = action.event_name();
    format!(
        r#"(function() {{
    var keyboardEvent = document.createEventObject ? document.createEventObject() : document.createEvent("Events");
    if (keyboardEvent.initEvent)
        keyboardEvent.initEvent("{event}", true, true);
    keyboardEvent.keyCode = {key};
    keyboardEvent.which = {key};
    var element = document.body || document;
    element.dispatchEvent ? element.dispatchEvent(keyboardEvent) : element.fireEvent("on{event}", keyboardEvent);
}})()"#
    )
}

/// Game status from the message overlay.
pub const DOM_STATUS: &str = r#"(function() {
    var messageContainer = document.querySelector(".game-message");
    if (messageContainer.className.search(/game-over/) !== -1) return "ended";
    if (messageContainer.className.search(/game-won/) !== -1) return "won";
    return "running";
})()"#;

/// Remember the tile container in `window.tileContainer`; true if found.
pub const FIND_TILE_CONTAINER: &str = r#"(function() {
    var elems = document.getElementsByTagName("div");
    for (var i = 0; i < elems.length; i++) {
        if (elems[i].className == "tile-container") {
            window.tileContainer = elems[i];
            return true;
        }
    }
    return false;
})()"#;

/// Score from the text nodes of the score box, skipping the "+N" animation child.
pub const DOM_SCORE: &str = r#"(function() {
    var scoreContainer = document.querySelector(".score-container");
    var scoreText = "";
    var scoreChildren = scoreContainer.childNodes;
    for (var i = 0; i < scoreChildren.length; ++i) {
        if (scoreChildren[i].nodeType == Node.TEXT_NODE) {
            scoreText += scoreChildren[i].textContent;
        }
    }
    return scoreText;
})()"#;

/// Class names of every tile, as a JSON array.
pub const DOM_TILES: &str = r#"(function() {
    var res = [];
    var tiles = window.tileContainer.children;
    for (var i = 0; i < tiles.length; i++)
        res.push(tiles[i].className);
    return JSON.stringify(res);
})()"#;

pub const CONTINUE_GAME: &str = r#"document.querySelector(".keep-playing-button").click()"#;

/// Replace `isGameTerminated` so the next input captures the manager instance.
pub const HOOK_MANAGER: &str = r#"(function() {
    window._tilebotIsGameTerminated = GameManager.prototype.isGameTerminated;
    GameManager.prototype.isGameTerminated = function() {
        GameManager._instance = this;
        return true;
    };
})()"#;

pub const UNHOOK_MANAGER: &str =
    r#"GameManager.prototype.isGameTerminated = window._tilebotIsGameTerminated"#;

pub const MANAGER_CAPTURED: &str =
    r#"typeof GameManager !== "undefined" && !!GameManager._instance"#;

pub const MANAGER_STATUS: &str = r#"(function() {
    var gm = GameManager._instance;
    if (gm.over) return "ended";
    if (gm.won && !gm.keepPlaying) return "won";
    return "running";
})()"#;

pub const MANAGER_SCORE: &str = "GameManager._instance.score";

/// The grid as JSON text; the debugger cannot serialize the Grid object itself.
pub const MANAGER_GRID: &str = "JSON.stringify(GameManager._instance.grid)";

/// Move through the captured manager.
pub fn manager_move(direction: Direction) -> String {
    format!(
        "GameManager._instance.move({})",
        MANAGER_MOVE_ORDER[direction.index()]
    )
}
