//! Client for the Firefox Remote Control extension.

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio_util::codec::FramedRead;
use tracing::{debug, trace};

use tilebot_protocols::{ControlError, ScriptExecutor};

use crate::framing::{DelimitedCodec, JsonCodec};

struct LineConnection {
    reader: FramedRead<OwnedReadHalf, JsonCodec<DelimitedCodec>>,
    writer: OwnedWriteHalf,
}

/// Sends one script per line and reads one JSON reply per line.
///
/// Calls are serialized: each holds the connection until its reply arrives.
pub struct RemoteControlClient {
    conn: tokio::sync::Mutex<LineConnection>,
}

impl RemoteControlClient {
    pub async fn connect(host: &str, port: u16) -> Result<Self, ControlError> {
        let addr = format!("{}:{}", host, port);
        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|e| ControlError::ConnectionFailed(format!("{}: {}", addr, e)))?;
        debug!("Connected to remote control at {}", addr);
        Ok(Self::from_stream(stream))
    }

    pub fn from_stream(stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            conn: tokio::sync::Mutex::new(LineConnection {
                reader: FramedRead::new(read_half, JsonCodec::newline()),
                writer: write_half,
            }),
        }
    }
}

/// Interpret one reply line.
fn reply_value(reply: Value) -> Result<Value, ControlError> {
    match reply {
        Value::Null => Ok(Value::Null),
        Value::Object(mut obj) => {
            if let Some(error) = obj.remove("error") {
                let message = match error {
                    Value::String(message) => message,
                    other => other.to_string(),
                };
                return Err(ControlError::remote("execute", "error", message));
            }
            Ok(obj.remove("result").unwrap_or(Value::Null))
        }
        other => Err(ControlError::Decode(format!(
            "unexpected remote control reply: {}",
            other
        ))),
    }
}

#[async_trait]
impl ScriptExecutor for RemoteControlClient {
    async fn execute(&self, script: &str) -> Result<Value, ControlError> {
        let line = format!("{}\r\n", script.replace('\n', " "));
        trace!("RC send: {}", line.trim_end());

        let mut conn = self.conn.lock().await;
        conn.writer.write_all(line.as_bytes()).await?;

        match conn.reader.next().await {
            Some(Ok(reply)) => {
                trace!("RC recv: {}", reply);
                reply_value(reply)
            }
            Some(Err(e)) => Err(e.into()),
            None => Err(ControlError::ConnectionClosed(
                "remote control closed the connection".to_string(),
            )),
        }
    }
}
