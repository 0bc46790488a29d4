//! Browser control errors.

use thiserror::Error;

/// Errors raised while talking to a browser's debugging interface.
///
/// Every variant carries plain strings so a single teardown reason can be
/// handed to every waiter of a closing session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControlError {
    /// Could not open the debugging connection.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The session ended while (or before) the request was in flight.
    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    /// Read or write failure on an open connection.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed frame or JSON payload.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The debugger rejected a command.
    #[error("Command {command} failed: {message} ({code})")]
    RemoteCommand {
        command: String,
        code: String,
        message: String,
    },

    /// The evaluated script threw.
    #[error("Script threw an exception: {0}")]
    ScriptException(String),

    /// Target discovery returned nothing to attach to.
    #[error("No pages to attach to")]
    NoTargets,

    /// The chosen target cannot be used.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Target enumeration over HTTP failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A bounded wait expired.
    #[error("Timeout: {0}")]
    Timeout(String),
}

impl ControlError {
    /// Build a remote-command error.
    pub fn remote(
        command: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::RemoteCommand {
            command: command.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error ends the session it came from.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ControlError::ConnectionFailed(_)
                | ControlError::ConnectionClosed(_)
                | ControlError::Transport(_)
                | ControlError::Decode(_)
        )
    }
}

impl From<std::io::Error> for ControlError {
    fn from(e: std::io::Error) -> Self {
        ControlError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ControlError {
    fn from(e: serde_json::Error) -> Self {
        ControlError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_command_display() {
        let err = ControlError::remote("Runtime.evaluate(expression='1')", "-32000", "Cannot find context");
        let display = err.to_string();
        assert!(display.contains("Runtime.evaluate"));
        assert!(display.contains("Cannot find context"));
        assert!(display.contains("(-32000)"));
    }

    #[test]
    fn test_script_exception_display() {
        let err = ControlError::ScriptException("Error: boom".to_string());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(ControlError::ConnectionClosed("eof".into()).is_fatal());
        assert!(ControlError::Decode("bad json".into()).is_fatal());
        assert!(ControlError::Transport("reset".into()).is_fatal());
        assert!(!ControlError::ScriptException("x".into()).is_fatal());
        assert!(!ControlError::remote("a.b", "c", "d").is_fatal());
        assert!(!ControlError::NoTargets.is_fatal());
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = ControlError::from(io_err);
        assert!(matches!(err, ControlError::Transport(_)));
        assert!(err.to_string().contains("reset by peer"));
    }

    #[test]
    fn test_json_error_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = ControlError::from(json_err);
        assert!(matches!(err, ControlError::Decode(_)));
    }

    #[test]
    fn test_clone_preserves_reason() {
        let err = ControlError::ConnectionClosed("peer closed".to_string());
        assert_eq!(err.clone(), err);
    }
}
