//! Wires the configured browser client, control mode and oracle together.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use tilebot_browser_ctrl::{
    ChromeClient, ChromeOptions, EvalMode, FirefoxClient, FirefoxOptions, FixedSelector,
    PromptSelector, RemoteControlClient, TargetSelector,
};
use tilebot_config::{BrowserConfig, BrowserKind, CtrlMode, FirefoxEvalMode, GameConfig};
use tilebot_game::{FastControl, HybridControl, KeyboardControl, Page, Pacing, PlayerSettings};
use tilebot_protocols::{ControlError, GameControl, ScriptExecutor};

/// `--target` if given, otherwise ask on the terminal.
pub(crate) fn selector(target: Option<usize>) -> Box<dyn TargetSelector> {
    match target {
        Some(index) => Box::new(FixedSelector(index)),
        None => Box::new(PromptSelector::stdio()),
    }
}

/// Connect to the configured browser and attach to a page.
pub(crate) async fn connect_executor(
    browser: &BrowserConfig,
    selector: &dyn TargetSelector,
) -> Result<Arc<dyn ScriptExecutor>, ControlError> {
    let port = browser.port();
    info!(
        "Connecting to {} on {}:{}",
        browser.kind.as_str(),
        browser.host,
        port
    );

    let executor: Arc<dyn ScriptExecutor> = match browser.kind {
        BrowserKind::Firefox => {
            let eval_mode = match browser.firefox_eval {
                FirefoxEvalMode::Async => EvalMode::Async,
                FirefoxEvalMode::Sync => EvalMode::Sync,
            };
            let options = FirefoxOptions::new(&browser.host, port).with_eval_mode(eval_mode);
            Arc::new(FirefoxClient::connect(&options, selector).await?)
        }
        BrowserKind::FirefoxRc => Arc::new(RemoteControlClient::connect(&browser.host, port).await?),
        BrowserKind::Chrome => {
            let options = ChromeOptions::new(&browser.host, port)
                .with_command_timeout(browser.command_timeout_secs.map(Duration::from_secs));
            Arc::new(ChromeClient::connect(&options, selector).await?)
        }
    };
    Ok(executor)
}

pub(crate) fn pacing(game: &GameConfig) -> Pacing {
    Pacing {
        key_delay: Duration::from_millis(game.key_delay_ms),
        move_delay: Duration::from_millis(game.move_delay_ms),
        ..Pacing::default()
    }
}

pub(crate) fn player_settings(game: &GameConfig) -> PlayerSettings {
    PlayerSettings {
        multithread: game.multithread,
        won_pause: Duration::from_millis(game.won_pause_ms),
    }
}

pub(crate) fn controller(mode: CtrlMode, page: Page) -> Arc<dyn GameControl> {
    match mode {
        CtrlMode::Keyboard => Arc::new(KeyboardControl::new(page)),
        CtrlMode::Fast => Arc::new(FastControl::new(page)),
        CtrlMode::Hybrid => Arc::new(HybridControl::new(page)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    fn browser(kind: BrowserKind, port: u16) -> BrowserConfig {
        BrowserConfig {
            kind,
            host: "127.0.0.1".to_string(),
            firefox_port: port,
            chrome_port: port,
            ..BrowserConfig::default()
        }
    }

    #[test]
    fn test_pacing_from_config() {
        let game = GameConfig {
            key_delay_ms: 20,
            move_delay_ms: 80,
            ..GameConfig::default()
        };
        let pacing = pacing(&game);
        assert_eq!(pacing.key_delay, Duration::from_millis(20));
        assert_eq!(pacing.move_delay, Duration::from_millis(80));
        assert_eq!(pacing.key_hold, Duration::from_millis(100));
    }

    #[test]
    fn test_player_settings_from_config() {
        let settings = player_settings(&GameConfig::default());
        assert!(settings.multithread);
        assert_eq!(settings.won_pause, Duration::from_millis(750));
    }

    #[tokio::test]
    async fn test_firefox_refused() {
        let port = closed_port().await;
        let result = connect_executor(&browser(BrowserKind::Firefox, port), &FixedSelector(1)).await;
        assert!(matches!(result, Err(ControlError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn test_remote_control_refused() {
        let port = closed_port().await;
        let result = connect_executor(&browser(BrowserKind::FirefoxRc, port), &FixedSelector(1)).await;
        assert!(matches!(result, Err(ControlError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn test_chrome_discovery_refused() {
        let port = closed_port().await;
        let result = connect_executor(&browser(BrowserKind::Chrome, port), &FixedSelector(1)).await;
        assert!(matches!(result, Err(ControlError::Http(_))));
    }
}
