//! CDP WebSocket client.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

use tilebot_protocols::{ControlError, ScriptExecutor};

use super::discovery::list_pages;
use super::protocol::{CdpRequest, CdpResponse, EvaluateResult, PageInfo, describe_command};
use crate::receiver::{FrameRouter, PendingRequests, spawn_receiver};
use crate::selection::{TargetSelector, choose_target};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// Where to find Chrome and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ChromeOptions {
    /// HTTP debugging endpoint, e.g. `http://localhost:9222`.
    pub endpoint: String,
    /// Per-command wait bound. `None` waits until the reply or disconnect.
    pub command_timeout: Option<Duration>,
}

impl ChromeOptions {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            endpoint: format!("http://{}:{}", host, port),
            command_timeout: None,
        }
    }

    pub fn with_command_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.command_timeout = timeout;
        self
    }
}

/// Routes CDP replies to their callers by id. Events are dropped.
struct ReplyRouter {
    pending: Arc<PendingRequests<u64>>,
}

impl FrameRouter for ReplyRouter {
    fn route(&mut self, frame: Value) -> Result<(), ControlError> {
        match frame.get("id").and_then(Value::as_u64) {
            Some(id) => {
                if !self.pending.complete(&id, Ok(frame)) {
                    trace!("Dropping reply for unknown id {}", id);
                }
            }
            None => {
                let method = frame.get("method").and_then(Value::as_str).unwrap_or("?");
                trace!("Dropping event {}", method);
            }
        }
        Ok(())
    }

    fn shutdown(&mut self, reason: ControlError) {
        self.pending.close(reason);
    }
}

/// CDP client bound to a single page.
///
/// Commands may be issued concurrently from any number of tasks; each call
/// resolves with the reply carrying its own id.
pub struct ChromeClient {
    /// WebSocket sender.
    ws_tx: tokio::sync::Mutex<WsSink>,
    /// Request ID counter.
    request_id: AtomicU64,
    /// Requests waiting for their reply.
    pending: Arc<PendingRequests<u64>>,
    command_timeout: Option<Duration>,
    /// Background task handle.
    _recv_task: tokio::task::JoinHandle<()>,
}

impl ChromeClient {
    /// Discover pages, pick one, connect to it and enable the Runtime domain.
    pub async fn connect(
        options: &ChromeOptions,
        selector: &dyn TargetSelector,
    ) -> Result<Self, ControlError> {
        let pages = list_pages(&options.endpoint).await?;
        let page: PageInfo = choose_target(pages, selector)?;
        let ws_url = page.web_socket_debugger_url.ok_or_else(|| {
            ControlError::InvalidSelection(format!(
                "page {:?} has no WebSocket debugger URL (is DevTools already attached?)",
                page.title
            ))
        })?;
        Self::connect_ws(&ws_url, options.command_timeout).await
    }

    /// Connect to a page's WebSocket debugger URL directly.
    pub async fn connect_ws(
        ws_url: &str,
        command_timeout: Option<Duration>,
    ) -> Result<Self, ControlError> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(ws_url)
            .await
            .map_err(|e| ControlError::ConnectionFailed(format!("WebSocket {}: {}", ws_url, e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let pending = Arc::new(PendingRequests::new());

        let frames = Box::pin(ws_source.filter_map(|msg| async move {
            match msg {
                Ok(Message::Text(text)) => Some(serde_json::from_str::<Value>(&text).map_err(ControlError::from)),
                Ok(Message::Binary(data)) => Some(serde_json::from_slice::<Value>(&data).map_err(ControlError::from)),
                Ok(Message::Close(frame)) => Some(Err(ControlError::ConnectionClosed(match frame {
                    Some(frame) => format!("WebSocket closed: {}", frame.reason),
                    None => "WebSocket closed".to_string(),
                }))),
                Ok(_) => None,
                Err(e) => Some(Err(ControlError::Transport(e.to_string()))),
            }
        }));

        let recv_task = spawn_receiver(
            "CDP",
            frames,
            ReplyRouter {
                pending: pending.clone(),
            },
        );

        debug!("CDP client connected to {}", ws_url);

        let client = Self {
            ws_tx: tokio::sync::Mutex::new(ws_sink),
            request_id: AtomicU64::new(1),
            pending,
            command_timeout,
            _recv_task: recv_task,
        };
        client.send_command("Runtime.enable", None).await?;
        Ok(client)
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::SeqCst)
    }

    async fn send_request(&self, request: &CdpRequest) -> Result<(), ControlError> {
        let json = serde_json::to_string(request)?;
        trace!("CDP send: {}", json);
        let mut ws = self.ws_tx.lock().await;
        ws.send(Message::Text(json.into()))
            .await
            .map_err(|e| ControlError::Transport(e.to_string()))
    }

    /// Send a command without waiting for its reply.
    pub async fn send_command(&self, method: &str, params: Option<Value>) -> Result<(), ControlError> {
        let request = CdpRequest {
            id: self.next_id(),
            method: method.to_string(),
            params,
        };
        self.send_request(&request).await
    }

    /// Send a CDP command and wait for its `result`.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, ControlError> {
        let id = self.next_id();
        let rx = self.pending.register(id)?;

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
        };
        if let Err(e) = self.send_request(&request).await {
            self.pending.cancel(&id);
            return Err(e);
        }

        let reply = match self.command_timeout {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(reply) => reply,
                Err(_) => {
                    self.pending.cancel(&id);
                    warn!("{} (id {}) timed out after {:?}", method, id, limit);
                    return Err(ControlError::Timeout(format!(
                        "{} did not answer within {:?}",
                        method, limit
                    )));
                }
            },
            None => rx.await,
        };
        let reply = reply
            .map_err(|_| ControlError::ConnectionClosed("receiver task ended".to_string()))??;

        let response: CdpResponse = serde_json::from_value(reply)?;
        if let Some(error) = response.error {
            return Err(ControlError::remote(
                describe_command(method, request.params.as_ref()),
                error.code.to_string(),
                error.message,
            ));
        }
        Ok(response.result.unwrap_or(Value::Null))
    }

    /// Number of commands still waiting for a reply.
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// Whether the session is still open.
    pub fn is_connected(&self) -> bool {
        !self.pending.is_closed()
    }
}

#[async_trait]
impl ScriptExecutor for ChromeClient {
    async fn execute(&self, script: &str) -> Result<Value, ControlError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": script,
                    "returnByValue": true,
                })),
            )
            .await?;

        let evaluation: EvaluateResult = serde_json::from_value(result)?;
        if let Some(text) = evaluation.exception_text() {
            return Err(ControlError::ScriptException(text));
        }
        Ok(evaluation.result.into_value())
    }
}

impl Drop for ChromeClient {
    fn drop(&mut self) {
        self._recv_task.abort();
    }
}
