//! CDP message types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::selection::TargetDescriptor;

/// CDP request message.
#[derive(Debug, Serialize)]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// CDP response or event message.
#[derive(Debug, Deserialize)]
pub struct CdpResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<CdpErrorResponse>,
    pub method: Option<String>,
    pub params: Option<Value>,
}

/// CDP error in response.
#[derive(Debug, Deserialize)]
pub struct CdpErrorResponse {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<Value>,
}

/// Page info from the `/json/list` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub page_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    pub web_socket_debugger_url: Option<String>,
}

impl TargetDescriptor for PageInfo {
    fn title(&self) -> &str {
        &self.title
    }
}

/// Remote object from the Runtime domain.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    #[serde(rename = "type", default)]
    pub object_type: String,
    pub subtype: Option<String>,
    pub class_name: Option<String>,
    pub value: Option<Value>,
    pub unserializable_value: Option<String>,
    pub description: Option<String>,
}

impl RemoteObject {
    /// The plain value: `value`, else `description`, else null.
    pub fn into_value(self) -> Value {
        match (self.value, self.description) {
            (Some(value), _) => value,
            (None, Some(description)) => Value::String(description),
            (None, None) => Value::Null,
        }
    }
}

/// Exception details from Runtime.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    #[serde(default)]
    pub exception_id: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub line_number: i64,
    #[serde(default)]
    pub column_number: i64,
    pub url: Option<String>,
    pub exception: Option<RemoteObject>,
}

/// Result of `Runtime.evaluate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResult {
    #[serde(default)]
    pub result: RemoteObject,
    pub exception_details: Option<ExceptionDetails>,
}

impl EvaluateResult {
    /// Describe the thrown exception, if any.
    pub fn exception_text(&self) -> Option<String> {
        let details = self.exception_details.as_ref()?;
        let text = self
            .result
            .description
            .clone()
            .or_else(|| details.exception.as_ref().and_then(|e| e.description.clone()))
            .unwrap_or_else(|| details.text.clone());
        Some(text)
    }
}

/// Render a command and its parameters for error messages,
/// e.g. `Runtime.evaluate(expression="1+1", returnByValue=true)`.
pub fn describe_command(method: &str, params: Option<&Value>) -> String {
    let args = match params {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    format!("{}({})", method, args)
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
