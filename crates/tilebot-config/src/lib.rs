//! # Tilebot Config
//!
//! Configuration management for tilebot: browser connection settings, game
//! pacing, oracle location and logging.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
