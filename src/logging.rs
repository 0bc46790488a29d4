//! Tracing setup.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use tilebot_config::LoggingConfig;

static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// `<dir>/<date>.log`, or `<dir>/<date>-<n>.log` with the first unused `n`
/// if that file already exists.
pub(crate) fn log_file_path(dir: &Path, date: &str) -> PathBuf {
    let path = dir.join(format!("{}.log", date));
    if !path.exists() {
        return path;
    }
    (1..)
        .map(|n| dir.join(format!("{}-{}.log", date, n)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(path)
}

/// Install the console layer, plus a file layer when `save_to_file` is set.
///
/// `RUST_LOG` takes precedence over the configured level.
pub(crate) fn init_tracing(config: &LoggingConfig) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let mut log_path = None;
    let file_layer = if config.save_to_file {
        std::fs::create_dir_all(&config.log_dir)?;
        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        let path = log_file_path(&config.log_dir, &date);
        let file_name = path
            .file_name()
            .ok_or("log file path has no file name")?
            .to_owned();

        let file_appender = tracing_appender::rolling::never(&config.log_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let _ = GUARD.set(guard);

        log_path = Some(path);
        Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_ansi(true))
        .with(file_layer)
        .try_init()?;

    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_log_file_path_fresh() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            log_file_path(dir.path(), "2026-10-16"),
            dir.path().join("2026-10-16.log")
        );
    }

    #[test]
    fn test_log_file_path_numbers_repeats() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("2026-10-16.log"), "").unwrap();
        assert_eq!(
            log_file_path(dir.path(), "2026-10-16"),
            dir.path().join("2026-10-16-1.log")
        );

        fs::write(dir.path().join("2026-10-16-1.log"), "").unwrap();
        fs::write(dir.path().join("2026-10-16-2.log"), "").unwrap();
        assert_eq!(
            log_file_path(dir.path(), "2026-10-16"),
            dir.path().join("2026-10-16-3.log")
        );
    }
}
