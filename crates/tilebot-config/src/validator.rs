//! Configuration validation.

use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_browser(config, &mut result);
        Self::validate_game(config, &mut result);
        Self::validate_oracle(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.host.is_empty() {
            result.add_error(ValidationError::new("browser.host", "Host cannot be empty"));
        }

        if config.browser.firefox_port == 0 {
            result.add_error(ValidationError::new(
                "browser.firefox_port",
                "Port cannot be 0",
            ));
        }

        if config.browser.chrome_port == 0 {
            result.add_error(ValidationError::new(
                "browser.chrome_port",
                "Port cannot be 0",
            ));
        }

        if config.browser.command_timeout_secs == Some(0) {
            result.add_error(ValidationError::new(
                "browser.command_timeout_secs",
                "command_timeout_secs must be greater than 0 (omit it to wait forever)",
            ));
        }
    }

    fn validate_game(config: &Config, result: &mut ValidationResult) {
        if config.game.won_pause_ms > 60_000 {
            result.add_warning(ValidationWarning::new(
                "game.won_pause_ms",
                "won_pause_ms is over a minute, the game will sit idle after every win",
            ));
        }
    }

    fn validate_oracle(config: &Config, result: &mut ValidationResult) {
        if !config.oracle.dir.exists() {
            result.add_warning(ValidationWarning::new(
                "oracle.dir",
                format!("Oracle directory does not exist: {:?}", config.oracle.dir),
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        if config.logging.level.is_empty() {
            result.add_error(ValidationError::new(
                "logging.level",
                "Log level cannot be empty",
            ));
        }

        if config.logging.save_to_file && config.logging.log_dir.as_os_str().is_empty() {
            result.add_error(ValidationError::new(
                "logging.log_dir",
                "log_dir must be set when save_to_file is enabled",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
