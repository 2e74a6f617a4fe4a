//! Attack listener: one polling state machine per monitored account.
//!
//! `AcquiringCursor` issues a zero-length `search` probe until the server
//! reports its current log position. `Polling` then asks for attack entries
//! from that cursor every cooldown, drops event ids already delivered, and
//! pushes whatever is new onto the shared output queue.
//!
//! Timeouts, server errors, and malformed pages skip the cycle; nothing here
//! is fatal.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use raidwatch_core::attack::decode_batch;
use raidwatch_core::protocol::{Command, Identity, SearchArgs, SearchPage};

use crate::config::AttackListenerSection;
use crate::services::SeenEvents;
use crate::transport::RequestClient;

/// Unit handed to the delivery side. `routes` is opaque pass-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingEnvelope {
    pub username: String,
    pub server: String,
    pub routes: Vec<u64>,
    pub messages: Vec<String>,
}

/// Consumer end of the shared output queue.
pub struct AttackFeed {
    rx: Mutex<mpsc::UnboundedReceiver<RoutingEnvelope>>,
}

impl AttackFeed {
    /// Oldest undelivered envelope. Waits until one is available; `None` once
    /// every producer is gone.
    pub async fn get(&self) -> Option<RoutingEnvelope> {
        self.rx.lock().await.recv().await
    }
}

/// Shared output queue: cloneable producer handle plus the single consumer.
pub fn attack_feed() -> (mpsc::UnboundedSender<RoutingEnvelope>, AttackFeed) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, AttackFeed { rx: Mutex::new(rx) })
}

#[derive(Debug, Clone, Copy)]
pub struct ListenerSettings {
    pub request_cooldown: Duration,
    pub request_timeout: Duration,
    pub dedup_capacity: usize,
}

impl From<&AttackListenerSection> for ListenerSettings {
    fn from(section: &AttackListenerSection) -> Self {
        Self {
            request_cooldown: section.request_cooldown(),
            request_timeout: section.request_timeout(),
            dedup_capacity: section.dedup_capacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    AcquiringCursor,
    Polling { cursor: u64 },
}

/// Result of one `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Timeout, server error, or unusable page. No state change.
    Skipped,
    CursorAcquired { cursor: u64 },
    NoNewEvents,
    Emitted { count: usize },
}

pub struct AccountPoller {
    client: Arc<dyn RequestClient>,
    identity: Identity,
    routes: Vec<u64>,
    settings: ListenerSettings,
    state: PollerState,
    seen: SeenEvents,
    output: mpsc::UnboundedSender<RoutingEnvelope>,
}

impl AccountPoller {
    pub fn new(
        client: Arc<dyn RequestClient>,
        identity: Identity,
        routes: Vec<u64>,
        settings: ListenerSettings,
        output: mpsc::UnboundedSender<RoutingEnvelope>,
    ) -> Self {
        Self {
            client,
            identity,
            routes,
            settings,
            state: PollerState::AcquiringCursor,
            seen: SeenEvents::new(settings.dedup_capacity),
            output,
        }
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    pub fn cursor(&self) -> Option<u64> {
        match self.state {
            PollerState::AcquiringCursor => None,
            PollerState::Polling { cursor } => Some(cursor),
        }
    }

    pub fn seen(&self) -> &SeenEvents {
        &self.seen
    }

    /// Poll until `cancel` fires: step, wait one cooldown, repeat.
    pub async fn run(mut self, cancel: CancellationToken) {
        tracing::info!(
            username = %self.identity.username,
            server = %self.identity.server,
            "attack listener started"
        );
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = self.step() => {}
            }
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.settings.request_cooldown) => {}
            }
        }
        tracing::info!(
            username = %self.identity.username,
            server = %self.identity.server,
            "attack listener stopped"
        );
    }

    /// Run one cycle of the state machine without sleeping.
    pub async fn step(&mut self) -> PollOutcome {
        match self.state {
            PollerState::AcquiringCursor => match self.request_cursor().await {
                Some(cursor) => {
                    tracing::info!(
                        username = %self.identity.username,
                        server = %self.identity.server,
                        cursor,
                        "attack cursor acquired"
                    );
                    self.state = PollerState::Polling { cursor };
                    PollOutcome::CursorAcquired { cursor }
                }
                None => PollOutcome::Skipped,
            },
            PollerState::Polling { cursor } => self.poll_from(cursor).await,
        }
    }

    async fn request_cursor(&self) -> Option<u64> {
        let content = self
            .client
            .send_request(
                &self.identity,
                Command::Search,
                SearchArgs::cursor_probe().to_args(),
                self.settings.request_timeout,
            )
            .await?;

        let value = match content.into_result() {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(
                    username = %self.identity.username,
                    server = %self.identity.server,
                    error = %e,
                    "failed to fetch current attack cursor"
                );
                return None;
            }
        };
        match SearchPage::cursor_of(value) {
            Ok(cursor) => Some(cursor),
            Err(e) => {
                tracing::warn!(username = %self.identity.username, error = %e, "bad cursor probe response");
                None
            }
        }
    }

    async fn poll_from(&mut self, cursor: u64) -> PollOutcome {
        let Some(content) = self
            .client
            .send_request(
                &self.identity,
                Command::Search,
                SearchArgs::attacks_from(cursor).to_args(),
                self.settings.request_timeout,
            )
            .await
        else {
            tracing::debug!(username = %self.identity.username, cursor, "attack poll got no response");
            return PollOutcome::Skipped;
        };

        let page = match content.into_result().and_then(SearchPage::from_value) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(
                    username = %self.identity.username,
                    server = %self.identity.server,
                    cursor,
                    error = %e,
                    "attack poll failed"
                );
                return PollOutcome::Skipped;
            }
        };

        self.advance_cursor(cursor, page.next_index);
        if page.entries.is_empty() {
            return PollOutcome::NoNewEvents;
        }

        let seen = &mut self.seen;
        let messages: Vec<String> = decode_batch(&page.entries)
            .into_iter()
            .filter(|record| seen.insert(record.id))
            .map(|record| record.to_string())
            .collect();
        if messages.is_empty() {
            return PollOutcome::NoNewEvents;
        }

        let count = messages.len();
        let envelope = RoutingEnvelope {
            username: self.identity.username.clone(),
            server: self.identity.server.clone(),
            routes: self.routes.clone(),
            messages,
        };
        if self.output.send(envelope).is_err() {
            tracing::warn!(username = %self.identity.username, "attack feed closed, warnings dropped");
        }
        tracing::info!(
            username = %self.identity.username,
            server = %self.identity.server,
            count,
            "attack warnings emitted"
        );
        PollOutcome::Emitted { count }
    }

    fn advance_cursor(&mut self, current: u64, next: u64) {
        if next < current {
            tracing::warn!(
                username = %self.identity.username,
                current,
                next,
                "server reported an older cursor, keeping current"
            );
            return;
        }
        self.state = PollerState::Polling { cursor: next };
    }
}
