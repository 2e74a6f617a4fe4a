//! Connection manager for the API server.
//!
//! Per attempt: `Connecting -> Active -> Closed`, then a fixed cooldown and a
//! new attempt, forever (until cancelled). While `Active` a send loop and a
//! receive loop share the socket; when either ends, both end.
//!
//! Requests in flight when the socket drops are not replayed. Their callers
//! simply time out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde_json::{Map, Value};
use tokio::sync::watch;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_util::sync::CancellationToken;

use raidwatch_core::auth::DigestSigner;
use raidwatch_core::error::{Result, RaidwatchError};
use raidwatch_core::protocol::{Command, Identity, InboundFrame, Request, ResponseContent};

use crate::transport::codec::{decode, Inbound};
use crate::transport::{OutboundQueue, PendingCalls, RequestClient};

/// Lifecycle of the current connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Connecting,
    Active,
    Closed,
}

pub struct ConnectionManager {
    url: String,
    reconnect_cooldown: Duration,
    signer: Arc<DigestSigner>,
    next_msg_id: AtomicU64,
    outbound: OutboundQueue,
    pending: PendingCalls,
    state: watch::Sender<ConnState>,
}

impl ConnectionManager {
    pub fn new(url: impl Into<String>, reconnect_cooldown: Duration, signer: Arc<DigestSigner>) -> Self {
        let (state, _) = watch::channel(ConnState::Closed);
        Self {
            url: url.into(),
            reconnect_cooldown,
            signer,
            next_msg_id: AtomicU64::new(0),
            outbound: OutboundQueue::new(),
            pending: PendingCalls::new(),
            state,
        }
    }

    pub fn state(&self) -> ConnState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnState> {
        self.state.subscribe()
    }

    /// Number of callers currently waiting for a response.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Connect loop. Returns only when `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        loop {
            self.state.send_replace(ConnState::Connecting);
            tracing::info!(url = %self.url, "connecting to api server");

            tokio::select! {
                _ = cancel.cancelled() => break,
                res = self.connect_once() => match res {
                    Ok(()) => tracing::info!(url = %self.url, "api connection closed"),
                    Err(e) => tracing::warn!(url = %self.url, error = %e, "api connection failed"),
                },
            }
            self.state.send_replace(ConnState::Closed);

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.reconnect_cooldown) => {}
            }
        }
        self.state.send_replace(ConnState::Closed);
        tracing::info!("connection manager stopped");
    }

    async fn connect_once(&self) -> Result<()> {
        let (ws, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| RaidwatchError::Transport(format!("connect failed: {e}")))?;
        self.state.send_replace(ConnState::Active);
        tracing::info!(url = %self.url, "api connection active");

        let (sink, stream) = ws.split();
        tokio::select! {
            res = self.send_loop(sink) => res,
            res = self.recv_loop(stream) => res,
        }
    }

    async fn send_loop<S>(&self, mut sink: S) -> Result<()>
    where
        S: Sink<Message, Error = tungstenite::Error> + Unpin,
    {
        loop {
            let (msg_id, wire) = self.outbound.pop().await;
            if !self.pending.contains(msg_id) {
                tracing::debug!(msg_id, "skipping request whose caller already gave up");
                continue;
            }
            sink.send(Message::text(wire))
                .await
                .map_err(|e| RaidwatchError::Transport(format!("send failed: {e}")))?;
            tracing::trace!(msg_id, "request written");
        }
    }

    async fn recv_loop<S>(&self, mut stream: S) -> Result<()>
    where
        S: Stream<Item = std::result::Result<Message, tungstenite::Error>> + Unpin,
    {
        while let Some(incoming) = stream.next().await {
            let msg = incoming.map_err(|e| RaidwatchError::Transport(format!("receive failed: {e}")))?;
            match decode(msg) {
                Ok(Inbound::Response(frame)) => self.deliver(frame),
                Ok(Inbound::Control) => {}
                Ok(Inbound::Close) => break,
                Err(e) => tracing::debug!(error = %e, "dropping unparseable frame"),
            }
        }
        Ok(())
    }

    fn deliver(&self, frame: InboundFrame) {
        let msg_id = frame.msg_id;
        if !self.pending.resolve(msg_id, frame.content) {
            tracing::debug!(msg_id, "dropping response with no waiting caller");
        }
    }

    fn allocate_msg_id(&self) -> u64 {
        self.next_msg_id.fetch_add(1, Ordering::Relaxed)
    }
}

fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

#[async_trait]
impl RequestClient for ConnectionManager {
    async fn send_request(
        &self,
        identity: &Identity,
        command: Command,
        args: Map<String, Value>,
        timeout: Duration,
    ) -> Option<ResponseContent> {
        let msg_id = self.allocate_msg_id();
        let request = Request::new(identity.clone(), command, args, unix_timestamp(), msg_id);
        let wire = match request.to_wire(&self.signer) {
            Ok(wire) => wire,
            Err(e) => {
                tracing::warn!(msg_id, %command, error = %e, "failed to build request");
                return None;
            }
        };

        let mut slot = self.pending.register(msg_id);
        self.outbound.push(msg_id, wire).await;

        match tokio::time::timeout(timeout, slot.recv()).await {
            Ok(content) => content,
            Err(_) => {
                tracing::debug!(
                    msg_id,
                    %command,
                    username = %identity.username,
                    server = %identity.server,
                    "request timed out"
                );
                None
            }
        }
    }
}
