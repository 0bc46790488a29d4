//! Wire framing for the debugging protocols.
//!
//! Both Firefox interfaces speak JSON over a raw TCP stream; they differ only
//! in how message boundaries are marked:
//!
//! - [`LengthPrefixedCodec`] - `<decimal byte length>:<payload>` (remote debugging protocol)
//! - [`DelimitedCodec`] - payload followed by a delimiter byte (remote control extension)
//!
//! [`JsonCodec`] wraps either one and yields `serde_json::Value` items, so a
//! connection can be driven with `tokio_util::codec::Framed`.

mod delimited;
mod json;
mod length_prefixed;

pub use delimited::DelimitedCodec;
pub use json::{JsonCodec, JsonFraming};
pub use length_prefixed::{LengthPrefixedCodec, MAX_FRAME_LEN, MAX_PREFIX_DIGITS};

use thiserror::Error;
use tilebot_protocols::ControlError;

/// Errors raised while splitting or parsing frames.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid length prefix: {0}")]
    InvalidLength(String),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<FrameError> for ControlError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Io(e) => ControlError::Transport(e.to_string()),
            other => ControlError::Decode(other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "framing_tests.rs"]
mod tests;
