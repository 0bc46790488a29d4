//! Tilebot - plays 2048 in a browser tab
//!
//! Main entry point for the tilebot CLI.

mod app;
mod cli;
mod logging;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use tilebot_config::{ConfigLoader, ConfigValidator};
use tilebot_game::{NativeOracle, Page, Player};
use tilebot_protocols::OracleError;

use crate::cli::Cli;

/// Oracle library missing.
const EXIT_NO_ORACLE: u8 = 1;
/// Any other setup or runtime failure.
const EXIT_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ConfigLoader::load_validated(cli.config.as_deref(), |c| cli.apply(c)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match logging::init_tracing(&config.logging) {
        Ok(Some(path)) => info!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    }
    for warning in ConfigValidator::validate(&config).warnings {
        warn!("{}: {}", warning.path, warning.message);
    }

    let oracle = match NativeOracle::load(&config.oracle.dir) {
        Ok(oracle) => {
            info!("Loaded oracle from {}", oracle.path().display());
            Arc::new(oracle)
        }
        Err(e @ OracleError::LibraryNotFound { .. }) => {
            error!("{}", e);
            return ExitCode::from(EXIT_NO_ORACLE);
        }
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let selector = app::selector(cli.target);
    let executor = match app::connect_executor(&config.browser, selector.as_ref()).await {
        Ok(executor) => executor,
        Err(e) => {
            error!("Could not connect to the browser: {}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let page = Page::new(executor, app::pacing(&config.game));
    let game = app::controller(config.game.ctrlmode, page);
    let player = Player::new(game, oracle, app::player_settings(&config.game));

    match player.run().await {
        Ok(summary) => {
            info!("Played {} moves", summary.moves);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Game failed: {}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
