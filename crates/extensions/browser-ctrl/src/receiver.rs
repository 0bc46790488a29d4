//! Background receive loop shared by the debugging clients.
//!
//! Each client owns one task that reads decoded frames off its connection and
//! hands them to a [`FrameRouter`]. When the stream ends or a frame cannot be
//! routed, the router is shut down and every waiter is released.

use std::collections::HashMap;
use std::hash::Hash;

use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace};

use tilebot_protocols::ControlError;

/// Outcome delivered to a waiting request.
pub(crate) type Reply = Result<Value, ControlError>;

/// Dispatches frames read by the receive loop.
pub(crate) trait FrameRouter: Send + 'static {
    /// Deliver one frame. An error ends the session.
    fn route(&mut self, frame: Value) -> Result<(), ControlError>;

    /// Release every waiter; no further frames will arrive.
    fn shutdown(&mut self, reason: ControlError);
}

/// The error handed to waiters when a session ends for `reason`.
pub(crate) fn closed_by(reason: ControlError) -> ControlError {
    match reason {
        closed @ ControlError::ConnectionClosed(_) => closed,
        other => ControlError::ConnectionClosed(other.to_string()),
    }
}

/// Spawn the receive loop for one connection.
pub(crate) fn spawn_receiver<S, R>(label: &'static str, mut frames: S, mut router: R) -> JoinHandle<()>
where
    S: Stream<Item = Result<Value, ControlError>> + Send + Unpin + 'static,
    R: FrameRouter,
{
    tokio::spawn(async move {
        let reason = loop {
            match frames.next().await {
                Some(Ok(frame)) => {
                    trace!("{} recv: {}", label, frame);
                    if let Err(e) = router.route(frame) {
                        error!("{} session ended: {}", label, e);
                        break e;
                    }
                }
                Some(Err(e)) => {
                    error!("{} receive error: {}", label, e);
                    break e;
                }
                None => {
                    debug!("{} connection closed by peer", label);
                    break ControlError::ConnectionClosed("peer closed the connection".to_string());
                }
            }
        };
        router.shutdown(closed_by(reason));
    })
}

/// Requests waiting for a reply, keyed by correlation id.
///
/// Once closed, the table rejects new registrations with the close reason,
/// so a request can never be left waiting on a dead session.
pub(crate) struct PendingRequests<K> {
    state: Mutex<PendingState<K>>,
}

struct PendingState<K> {
    closed: Option<ControlError>,
    waiters: HashMap<K, oneshot::Sender<Reply>>,
}

impl<K: Eq + Hash> PendingRequests<K> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(PendingState {
                closed: None,
                waiters: HashMap::new(),
            }),
        }
    }

    /// Register a waiter for `key`.
    pub(crate) fn register(&self, key: K) -> Result<oneshot::Receiver<Reply>, ControlError> {
        let mut state = self.state.lock();
        if let Some(reason) = &state.closed {
            return Err(reason.clone());
        }
        let (tx, rx) = oneshot::channel();
        state.waiters.insert(key, tx);
        Ok(rx)
    }

    /// Hand `reply` to the waiter for `key`. Returns false if nobody waits.
    pub(crate) fn complete(&self, key: &K, reply: Reply) -> bool {
        let waiter = self.state.lock().waiters.remove(key);
        match waiter {
            Some(tx) => {
                // The caller may have given up (timeout); that is not an error here.
                let _ = tx.send(reply);
                true
            }
            None => false,
        }
    }

    /// Forget the waiter for `key`.
    pub(crate) fn cancel(&self, key: &K) {
        self.state.lock().waiters.remove(key);
    }

    /// Fail every waiter with `reason` and reject later registrations.
    pub(crate) fn close(&self, reason: ControlError) {
        let waiters: Vec<_> = {
            let mut state = self.state.lock();
            if state.closed.is_none() {
                state.closed = Some(reason.clone());
            }
            state.waiters.drain().map(|(_, tx)| tx).collect()
        };
        if !waiters.is_empty() {
            debug!("Releasing {} pending request(s): {}", waiters.len(), reason);
        }
        for tx in waiters {
            let _ = tx.send(Err(reason.clone()));
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.state.lock().waiters.len()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state.lock().closed.is_some()
    }
}
