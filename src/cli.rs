//! CLI definitions for tilebot.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use tilebot_config::{BrowserKind, Config, CtrlMode};

/// Tilebot CLI.
#[derive(Parser, Debug)]
#[command(name = "tilebot")]
#[command(about = "Use the AI to play 2048 via browser control")]
#[command(version)]
pub(crate) struct Cli {
    /// Port number to control on (default: 32000 for Firefox, 9222 for Chrome)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Browser you're using
    #[arg(short, long, value_enum)]
    pub browser: Option<BrowserArg>,

    /// Control mode to use. If the browser control doesn't seem to work, try changing this.
    #[arg(short = 'k', long, value_enum)]
    pub ctrlmode: Option<CtrlModeArg>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Page to attach to (1-based), instead of asking
    #[arg(short, long)]
    pub target: Option<usize>,

    /// Also write the log to a dated file in the log directory
    #[arg(long)]
    pub log_file: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum BrowserArg {
    /// Firefox with remote debugging
    Firefox,
    /// Firefox with the Remote Control extension (deprecated)
    FirefoxRc,
    /// Chrome with remote debugging
    Chrome,
}

impl From<BrowserArg> for BrowserKind {
    fn from(arg: BrowserArg) -> Self {
        match arg {
            BrowserArg::Firefox => BrowserKind::Firefox,
            BrowserArg::FirefoxRc => BrowserKind::FirefoxRc,
            BrowserArg::Chrome => BrowserKind::Chrome,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum CtrlModeArg {
    Keyboard,
    Fast,
    Hybrid,
}

impl From<CtrlModeArg> for CtrlMode {
    fn from(arg: CtrlModeArg) -> Self {
        match arg {
            CtrlModeArg::Keyboard => CtrlMode::Keyboard,
            CtrlModeArg::Fast => CtrlMode::Fast,
            CtrlModeArg::Hybrid => CtrlMode::Hybrid,
        }
    }
}

impl Cli {
    /// Apply command line overrides on top of the loaded config.
    ///
    /// `--port` sets the port of whichever browser ends up selected.
    pub fn apply(&self, config: &mut Config) {
        if let Some(browser) = self.browser {
            config.browser.kind = browser.into();
        }
        if let Some(port) = self.port {
            match config.browser.kind {
                BrowserKind::Firefox | BrowserKind::FirefoxRc => config.browser.firefox_port = port,
                BrowserKind::Chrome => config.browser.chrome_port = port,
            }
        }
        if let Some(mode) = self.ctrlmode {
            config.game.ctrlmode = mode.into();
        }
        if self.log_file {
            config.logging.save_to_file = true;
        }
    }
}
