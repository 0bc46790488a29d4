//! Remote debugging protocol packets and grips.

use serde::Deserialize;
use serde_json::{Map, Value};

use tilebot_protocols::ControlError;

use crate::selection::TargetDescriptor;

/// Unsolicited packet types a server may interleave with replies.
pub(crate) fn is_notification(packet: &Value, expected: &[&str]) -> bool {
    match packet.get("type").and_then(Value::as_str) {
        Some(kind) => !expected.contains(&kind),
        None => false,
    }
}

/// Build an outbound packet addressed to `to`.
pub(crate) fn packet(to: &str, kind: &str, payload: Value) -> Value {
    let mut packet = match payload {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    packet.insert("to".to_string(), Value::String(to.to_string()));
    packet.insert("type".to_string(), Value::String(kind.to_string()));
    Value::Object(packet)
}

/// The remote-command error carried by `reply`, if any.
pub(crate) fn reply_error(actor: &str, kind: &str, reply: &Value) -> Option<ControlError> {
    let error = reply.get("error").filter(|e| !e.is_null())?;
    let code = match error.as_str() {
        Some(code) => code.to_string(),
        None => error.to_string(),
    };
    let message = reply
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Some(ControlError::remote(format!("{}.{}", actor, kind), code, message))
}

/// Which console command evaluates scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvalMode {
    /// `evaluateJSAsync`: an ack with a `resultID`, then an `evaluationResult`.
    #[default]
    Async,
    /// `evaluateJS`: the reply is the result.
    Sync,
}

impl EvalMode {
    pub fn command(self) -> &'static str {
        match self {
            EvalMode::Async => "evaluateJSAsync",
            EvalMode::Sync => "evaluateJS",
        }
    }
}

/// A tab as listed by `root.listTabs`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabDescriptor {
    pub actor: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Present on servers that predate target descriptors.
    pub console_actor: Option<String>,
    #[serde(default)]
    pub selected: bool,
}

impl TargetDescriptor for TabDescriptor {
    fn title(&self) -> &str {
        &self.title
    }
}

/// The `frame` form returned by `getTarget`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetForm {
    pub actor: String,
    pub console_actor: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

/// A value handed back by the console actor.
#[derive(Debug, Clone, PartialEq)]
pub enum Grip {
    /// A value that needs no further requests.
    Value(Value),
    /// A string too long to inline; the rest lives behind `actor`.
    LongString {
        actor: String,
        length: u64,
        initial: String,
    },
}

impl Grip {
    pub fn parse(grip: &Value) -> Grip {
        let Some(kind) = grip.get("type").and_then(Value::as_str) else {
            return Grip::Value(grip.clone());
        };

        match kind {
            "undefined" | "null" => Grip::Value(Value::Null),
            "Infinity" | "-Infinity" | "NaN" | "-0" => Grip::Value(Value::String(kind.to_string())),
            "longString" => {
                let actor = grip.get("actor").and_then(Value::as_str);
                let length = grip.get("length").and_then(Value::as_u64);
                let initial = grip.get("initial").and_then(Value::as_str).unwrap_or_default();
                match (actor, length) {
                    (Some(actor), Some(length)) => Grip::LongString {
                        actor: actor.to_string(),
                        length,
                        initial: initial.to_string(),
                    },
                    _ => Grip::Value(Value::String(initial.to_string())),
                }
            }
            _ => match (grip.get("value"), grip.get("description")) {
                (Some(value), _) => Grip::Value(value.clone()),
                (None, Some(description)) => Grip::Value(description.clone()),
                (None, None) => Grip::Value(Value::Null),
            },
        }
    }
}

/// Description of the exception carried by an evaluation result, if one was thrown.
pub(crate) fn exception_text(result: &Value) -> Option<String> {
    let exception = result.get("exception").filter(|e| !e.is_null());
    let message = result.get("exceptionMessage").filter(|m| !m.is_null());
    if exception.is_none() && message.is_none() {
        return None;
    }

    let text = message
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| exception.and_then(describe_exception))
        .unwrap_or_else(|| "unknown exception".to_string());
    Some(text)
}

fn describe_exception(exception: &Value) -> Option<String> {
    match exception {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => {
            let preview = obj.get("preview");
            let name = preview.and_then(|p| p.get("name")).and_then(Value::as_str);
            let message = preview.and_then(|p| p.get("message")).and_then(Value::as_str);
            match (name, message) {
                (Some(name), Some(message)) => Some(format!("{}: {}", name, message)),
                (None, Some(message)) => Some(message.to_string()),
                _ => obj
                    .get("description")
                    .or_else(|| obj.get("class"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
