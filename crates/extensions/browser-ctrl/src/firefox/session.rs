//! One remote debugging connection and its receive loop.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::OwnedMutexGuard;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, trace};

use tilebot_protocols::ControlError;

use super::actors::{ActorInbox, ActorRouter, ActorTable, Inbox};
use super::protocol::{is_notification, packet, reply_error};
use crate::framing::{JsonCodec, LengthPrefixedCodec};
use crate::receiver::spawn_receiver;

type PacketSink = FramedWrite<OwnedWriteHalf, JsonCodec<LengthPrefixedCodec>>;

/// A request that has been sent, holding its actor's queue until the reply
/// is read.
///
/// Dropped unanswered (the caller was cancelled), it leaves the reply owed on
/// the queue and the next reader discards it.
pub(crate) struct InFlight {
    inbox: OwnedMutexGuard<ActorInbox>,
    expected: &'static [&'static str],
    answered: bool,
}

impl InFlight {
    /// The locked queue, for packets that follow the reply.
    pub(crate) fn receiver(&mut self) -> &mut UnboundedReceiver<Value> {
        &mut self.inbox.rx
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.answered {
            self.inbox.owed.push_back(self.expected);
        }
    }
}

/// An open connection: the writer, the actor queues and the receive loop.
pub(crate) struct ActorSession {
    writer: tokio::sync::Mutex<PacketSink>,
    actors: Arc<ActorTable>,
    _recv_task: JoinHandle<()>,
}

impl ActorSession {
    pub(crate) fn open(stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        let actors = Arc::new(ActorTable::new());

        let frames = FramedRead::new(read_half, JsonCodec::length_prefixed())
            .map(|frame| frame.map_err(ControlError::from));
        let recv_task = spawn_receiver(
            "RDP",
            frames,
            ActorRouter {
                actors: actors.clone(),
            },
        );

        Self {
            writer: tokio::sync::Mutex::new(FramedWrite::new(
                write_half,
                JsonCodec::length_prefixed(),
            )),
            actors,
            _recv_task: recv_task,
        }
    }

    /// The inbound queue of `actor`.
    pub(crate) fn inbox(&self, actor: &str) -> Result<Inbox, ControlError> {
        self.actors.inbox(actor)
    }

    /// Send `kind` to `actor` with its queue locked.
    ///
    /// `expected` lists the `type`s the reply may carry.
    pub(crate) async fn begin(
        &self,
        actor: &str,
        kind: &str,
        payload: Value,
        expected: &'static [&'static str],
    ) -> Result<InFlight, ControlError> {
        let inbox = self.inbox(actor)?.lock_owned().await;

        let packet = packet(actor, kind, payload);
        trace!("RDP send: {}", packet);
        let mut writer = self.writer.lock().await;
        // Once buffered the packet goes out with the next flush, so from here
        // on a reply is owed.
        writer.feed(packet).await.map_err(ControlError::from)?;
        let in_flight = InFlight {
            inbox,
            expected,
            answered: false,
        };
        writer.flush().await.map_err(ControlError::from)?;
        Ok(in_flight)
    }

    /// Read the reply to `in_flight`.
    pub(crate) async fn reply(&self, in_flight: &mut InFlight) -> Result<Value, ControlError> {
        let inbox = &mut *in_flight.inbox;
        while let Some(&owed) = inbox.owed.front() {
            let stale = self.next_reply(&mut inbox.rx, owed).await?;
            inbox.owed.pop_front();
            debug!("Discarding reply to an abandoned request: {}", stale);
        }

        let reply = self.next_reply(&mut inbox.rx, in_flight.expected).await?;
        in_flight.answered = true;
        Ok(reply)
    }

    /// Next packet on a locked queue, or the teardown reason.
    pub(crate) async fn recv(&self, rx: &mut UnboundedReceiver<Value>) -> Result<Value, ControlError> {
        match rx.recv().await {
            Some(packet) => Ok(packet),
            None => Err(self.actors.closed_reason()),
        }
    }

    /// Next reply on a locked queue, skipping notifications not in `expected`.
    async fn next_reply(
        &self,
        rx: &mut UnboundedReceiver<Value>,
        expected: &[&str],
    ) -> Result<Value, ControlError> {
        loop {
            let packet = self.recv(rx).await?;
            if is_notification(&packet, expected) {
                trace!("Skipping notification {}", packet);
                continue;
            }
            return Ok(packet);
        }
    }

    /// Send `kind` to `actor` and wait for its reply.
    pub(crate) async fn request(&self, actor: &str, kind: &str, payload: Value) -> Result<Value, ControlError> {
        self.request_expecting(actor, kind, payload, &[]).await
    }

    /// Like [`request`](Self::request), for commands whose reply carries a `type`.
    pub(crate) async fn request_expecting(
        &self,
        actor: &str,
        kind: &str,
        payload: Value,
        expected: &'static [&'static str],
    ) -> Result<Value, ControlError> {
        let mut in_flight = self.begin(actor, kind, payload, expected).await?;
        let reply = self.reply(&mut in_flight).await?;
        match reply_error(actor, kind, &reply) {
            Some(err) => Err(err),
            None => Ok(reply),
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.actors.is_closed()
    }
}

impl Drop for ActorSession {
    fn drop(&mut self) {
        self._recv_task.abort();
    }
}
