//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub game: GameConfig,

    #[serde(default)]
    pub oracle: OracleConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which debugging interface to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrowserKind {
    /// Firefox remote debugging protocol (actors, length-prefixed frames).
    #[default]
    Firefox,
    /// Firefox "Remote Control" extension (newline-delimited JSON).
    FirefoxRc,
    /// Chrome DevTools protocol over WebSocket.
    Chrome,
}

impl BrowserKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BrowserKind::Firefox => "firefox",
            BrowserKind::FirefoxRc => "firefox-rc",
            BrowserKind::Chrome => "chrome",
        }
    }
}

/// Which Firefox console command evaluates scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirefoxEvalMode {
    /// `evaluateJSAsync`: an ack with a `resultID`, then an `evaluationResult`.
    #[default]
    Async,
    /// Legacy `evaluateJS`: the reply carries the result.
    Sync,
}

/// How moves and state are exchanged with the game page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtrlMode {
    /// DOM scraping and synthetic key events.
    Keyboard,
    /// Hooks the game manager object directly.
    Fast,
    /// Game manager for reads, key events for moves.
    #[default]
    Hybrid,
}

/// Browser connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default)]
    pub kind: BrowserKind,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_firefox_port")]
    pub firefox_port: u16,

    #[serde(default = "default_chrome_port")]
    pub chrome_port: u16,

    /// Per-command wait bound for the Chrome client. Unset means wait forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_timeout_secs: Option<u64>,

    #[serde(default)]
    pub firefox_eval: FirefoxEvalMode,
}

impl BrowserConfig {
    /// Default port for the configured browser kind.
    pub fn port(&self) -> u16 {
        match self.kind {
            BrowserKind::Firefox | BrowserKind::FirefoxRc => self.firefox_port,
            BrowserKind::Chrome => self.chrome_port,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            kind: BrowserKind::default(),
            host: default_host(),
            firefox_port: default_firefox_port(),
            chrome_port: default_chrome_port(),
            command_timeout_secs: None,
            firefox_eval: FirefoxEvalMode::default(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_firefox_port() -> u16 {
    32000
}

fn default_chrome_port() -> u16 {
    9222
}

/// Game pacing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub ctrlmode: CtrlMode,

    /// Score the four directions on parallel blocking workers.
    #[serde(default = "default_multithread")]
    pub multithread: bool,

    #[serde(default = "default_won_pause_ms")]
    pub won_pause_ms: u64,

    /// Gap between a key's down and up events.
    #[serde(default = "default_key_delay_ms")]
    pub key_delay_ms: u64,

    /// Settle time after a keyboard move.
    #[serde(default = "default_move_delay_ms")]
    pub move_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ctrlmode: CtrlMode::default(),
            multithread: default_multithread(),
            won_pause_ms: default_won_pause_ms(),
            key_delay_ms: default_key_delay_ms(),
            move_delay_ms: default_move_delay_ms(),
        }
    }
}

fn default_multithread() -> bool {
    true
}

fn default_won_pause_ms() -> u64 {
    750
}

fn default_key_delay_ms() -> u64 {
    10
}

fn default_move_delay_ms() -> u64 {
    50
}

/// Native oracle location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Directory holding `2048.{so,dll,dylib}`.
    #[serde(default = "default_oracle_dir")]
    pub dir: PathBuf,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            dir: default_oracle_dir(),
        }
    }
}

fn default_oracle_dir() -> PathBuf {
    PathBuf::from("bin")
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub save_to_file: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            save_to_file: false,
            log_dir: default_log_dir(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}
