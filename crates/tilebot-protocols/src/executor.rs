//! Script execution trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ControlError;

/// Runs JavaScript in a remote browser tab.
///
/// Implemented by every browser client. A call resolves once the matching
/// reply has been routed back by the client's receiver, or once the session
/// ends. Calls are not idempotent: a script with side effects runs again
/// each time it is sent.
#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    /// Evaluate `script` and return its value.
    ///
    /// `undefined`, `null` and values with no JSON form come back as
    /// [`Value::Null`].
    async fn execute(&self, script: &str) -> Result<Value, ControlError>;
}
