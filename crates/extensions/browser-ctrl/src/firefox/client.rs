//! Remote debugging protocol client.

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, trace};

use tilebot_protocols::{ControlError, ScriptExecutor};

use super::protocol::{EvalMode, Grip, TabDescriptor, TargetForm, exception_text, reply_error};
use super::session::ActorSession;
use crate::selection::{TargetSelector, choose_target};

/// Error codes from servers that dropped the `attach` request.
const ATTACH_UNSUPPORTED: &[&str] = &["unrecognizedPacketType", "unknownMethod"];

/// Where to find Firefox and which evaluate command to use.
#[derive(Debug, Clone)]
pub struct FirefoxOptions {
    pub host: String,
    pub port: u16,
    pub eval_mode: EvalMode,
}

impl FirefoxOptions {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            eval_mode: EvalMode::default(),
        }
    }

    pub fn with_eval_mode(mut self, eval_mode: EvalMode) -> Self {
        self.eval_mode = eval_mode;
        self
    }
}

/// Remote debugging client attached to one tab's console actor.
///
/// Requests to the same actor are answered in order; concurrent calls to
/// [`execute`](ScriptExecutor::execute) queue up behind one another.
pub struct FirefoxClient {
    session: ActorSession,
    tab: TabDescriptor,
    target_actor: String,
    console_actor: String,
    eval_mode: EvalMode,
}

impl FirefoxClient {
    /// Connect, pick a tab and attach to it.
    pub async fn connect(
        options: &FirefoxOptions,
        selector: &dyn TargetSelector,
    ) -> Result<Self, ControlError> {
        let addr = format!("{}:{}", options.host, options.port);
        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|e| ControlError::ConnectionFailed(format!("{}: {}", addr, e)))?;
        debug!("Connected to {}", addr);
        Self::attach(stream, options.eval_mode, selector).await
    }

    /// Run the startup sequence on an already connected stream.
    pub async fn attach(
        stream: TcpStream,
        eval_mode: EvalMode,
        selector: &dyn TargetSelector,
    ) -> Result<Self, ControlError> {
        let session = ActorSession::open(stream);

        let root = session.inbox("root")?;
        let greeting = session.recv(&mut root.lock().await.rx).await?;
        let application_type = greeting
            .get("applicationType")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        debug!("Server greeting: applicationType={}", application_type);

        let reply = session.request("root", "listTabs", json!({})).await?;
        let tabs: Vec<TabDescriptor> =
            serde_json::from_value(reply.get("tabs").cloned().unwrap_or_else(|| json!([])))?;
        debug!("Found {} tab(s)", tabs.len());
        let tab = choose_target(tabs, selector)?;

        let (target_actor, console_actor) = match &tab.console_actor {
            Some(console) => (tab.actor.clone(), console.clone()),
            None => {
                let reply = session.request(&tab.actor, "getTarget", json!({})).await?;
                let frame = reply.get("frame").cloned().ok_or_else(|| {
                    ControlError::Decode(format!("getTarget reply without a frame: {}", reply))
                })?;
                let form: TargetForm = serde_json::from_value(frame)?;
                (form.actor, form.console_actor)
            }
        };

        match session
            .request_expecting(&target_actor, "attach", json!({}), &["tabAttached"])
            .await
        {
            Ok(_) => debug!("Attached to {}", target_actor),
            Err(ControlError::RemoteCommand { code, .. })
                if ATTACH_UNSUPPORTED.contains(&code.as_str()) =>
            {
                debug!("{} does not support attach ({}), continuing", target_actor, code)
            }
            Err(e) => return Err(e),
        }

        info!("Using console actor {} for {:?}", console_actor, tab.title);
        Ok(Self {
            session,
            tab,
            target_actor,
            console_actor,
            eval_mode,
        })
    }

    pub fn tab(&self) -> &TabDescriptor {
        &self.tab
    }

    pub fn target_actor(&self) -> &str {
        &self.target_actor
    }

    pub fn console_actor(&self) -> &str {
        &self.console_actor
    }

    pub fn eval_mode(&self) -> EvalMode {
        self.eval_mode
    }

    /// Whether the session is still open.
    pub fn is_connected(&self) -> bool {
        !self.session.is_closed()
    }

    /// Send `kind` to `actor` and wait for its reply.
    pub async fn request(&self, actor: &str, kind: &str, payload: Value) -> Result<Value, ControlError> {
        self.session.request(actor, kind, payload).await
    }

    /// Wait on a locked console queue for the `evaluationResult` matching `result_id`.
    async fn wait_for_evaluation(
        &self,
        rx: &mut UnboundedReceiver<Value>,
        result_id: &Value,
    ) -> Result<Value, ControlError> {
        loop {
            let packet = self.session.recv(rx).await?;
            let is_result = packet.get("type").and_then(Value::as_str) == Some("evaluationResult")
                && packet.get("resultID") == Some(result_id);
            if is_result {
                return Ok(packet);
            }
            trace!("Skipping {} while waiting for evaluation {}", packet, result_id);
        }
    }

    /// Evaluate `script` and return the raw evaluation packet.
    async fn evaluate(&self, script: &str) -> Result<Value, ControlError> {
        let command = self.eval_mode.command();
        let mut in_flight = self
            .session
            .begin(&self.console_actor, command, json!({ "text": script }), &[])
            .await?;
        let reply = self.session.reply(&mut in_flight).await?;
        if let Some(err) = reply_error(&self.console_actor, command, &reply) {
            return Err(err);
        }

        // An async ack carries only the id; the result follows separately.
        let pending_id = match reply.get("resultID") {
            Some(id) if reply.get("result").is_none() && reply.get("exception").is_none() => {
                Some(id.clone())
            }
            _ => None,
        };
        match pending_id {
            Some(id) => self.wait_for_evaluation(in_flight.receiver(), &id).await,
            None => Ok(reply),
        }
    }

    /// Fetch the full text behind a long string grip.
    async fn long_string(&self, actor: &str, length: u64) -> Result<Value, ControlError> {
        let reply = self
            .session
            .request(actor, "substring", json!({ "start": 0, "end": length }))
            .await?;
        match reply.get("substring") {
            Some(text) => Ok(text.clone()),
            None => Err(ControlError::Decode(format!(
                "substring reply without text: {}",
                reply
            ))),
        }
    }
}

#[async_trait]
impl ScriptExecutor for FirefoxClient {
    async fn execute(&self, script: &str) -> Result<Value, ControlError> {
        let evaluation = self.evaluate(script).await?;
        if let Some(text) = exception_text(&evaluation) {
            return Err(ControlError::ScriptException(text));
        }

        let grip = evaluation.get("result").cloned().unwrap_or(Value::Null);
        match Grip::parse(&grip) {
            Grip::Value(value) => Ok(value),
            Grip::LongString { actor, length, .. } => self.long_string(&actor, length).await,
        }
    }
}
