//! Per-actor inbound queues.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;

use tilebot_protocols::ControlError;

use crate::receiver::FrameRouter;

/// Receiving end of one actor's queue.
pub(crate) struct ActorInbox {
    pub(crate) rx: mpsc::UnboundedReceiver<Value>,
    /// Replies still due to requests whose callers went away, oldest first.
    /// Each entry is the reply types that request accepted.
    pub(crate) owed: VecDeque<&'static [&'static str]>,
}

/// Holding the lock for a whole send/receive cycle keeps concurrent
/// requests to the same actor from taking each other's replies.
pub(crate) type Inbox = Arc<tokio::sync::Mutex<ActorInbox>>;

struct ActorQueue {
    tx: mpsc::UnboundedSender<Value>,
    rx: Inbox,
}

impl ActorQueue {
    fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Arc::new(tokio::sync::Mutex::new(ActorInbox {
                rx,
                owed: VecDeque::new(),
            })),
        }
    }
}

struct ActorState {
    closed: Option<ControlError>,
    queues: HashMap<String, ActorQueue>,
}

/// Inbound queues keyed by actor name.
pub(crate) struct ActorTable {
    state: Mutex<ActorState>,
}

impl ActorTable {
    /// A table with the `root` queue already in place for the greeting.
    pub(crate) fn new() -> Self {
        let mut queues = HashMap::new();
        queues.insert("root".to_string(), ActorQueue::new());
        Self {
            state: Mutex::new(ActorState {
                closed: None,
                queues,
            }),
        }
    }

    /// The queue for `actor`, created on first use.
    pub(crate) fn inbox(&self, actor: &str) -> Result<Inbox, ControlError> {
        let mut state = self.state.lock();
        if let Some(reason) = &state.closed {
            return Err(reason.clone());
        }
        let queue = state
            .queues
            .entry(actor.to_string())
            .or_insert_with(ActorQueue::new);
        Ok(queue.rx.clone())
    }

    /// Queue `packet` for the actor named in its `from` field.
    pub(crate) fn deliver(&self, packet: Value) -> Result<(), ControlError> {
        let Some(from) = packet.get("from").and_then(Value::as_str) else {
            return Err(ControlError::Decode(format!(
                "packet without a sender: {}",
                packet
            )));
        };

        let state = self.state.lock();
        match state.queues.get(from) {
            Some(queue) => {
                // The receiver lives in the table, so the send cannot fail.
                let _ = queue.tx.send(packet);
                Ok(())
            }
            None => Err(ControlError::Decode(format!(
                "packet from unknown actor {}",
                from
            ))),
        }
    }

    /// Stop accepting requests and end every queue once it is drained.
    pub(crate) fn close(&self, reason: ControlError) {
        let mut state = self.state.lock();
        if state.closed.is_none() {
            state.closed = Some(reason);
        }
        state.queues.clear();
    }

    /// Why the table was closed.
    pub(crate) fn closed_reason(&self) -> ControlError {
        self.state
            .lock()
            .closed
            .clone()
            .unwrap_or_else(|| ControlError::ConnectionClosed("session closed".to_string()))
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state.lock().closed.is_some()
    }
}

/// Routes packets into the actor table.
pub(crate) struct ActorRouter {
    pub(crate) actors: Arc<ActorTable>,
}

impl FrameRouter for ActorRouter {
    fn route(&mut self, frame: Value) -> Result<(), ControlError> {
        self.actors.deliver(frame)
    }

    fn shutdown(&mut self, reason: ControlError) {
        self.actors.close(reason);
    }
}
