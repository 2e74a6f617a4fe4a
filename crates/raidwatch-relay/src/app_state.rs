//! Composition root for the relay.
//!
//! Builds the connection manager, the shared attack feed, one poller per
//! player with attack warnings enabled, and the status/control helpers, all
//! from an explicit `RelayConfig`. Spawned tasks live in a `TaskRegistry` so
//! `shutdown` can stop everything together.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use raidwatch_core::auth::DigestSigner;
use raidwatch_core::error::Result;

use crate::config::RelayConfig;
use crate::services::{
    attack_feed, AccountPoller, AttackFeed, ControlClient, ListenerSettings, StatusMonitor,
};
use crate::tasks::TaskRegistry;
use crate::transport::{ConnectionManager, RequestClient};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: RelayConfig,
    connection: Arc<ConnectionManager>,
    feed: AttackFeed,
    pollers: Mutex<Vec<AccountPoller>>,
    status: StatusMonitor,
    control: ControlClient,
    tasks: TaskRegistry,
    started: AtomicBool,
}

impl AppState {
    /// Build application state. Nothing is spawned until `start`.
    pub fn new(cfg: RelayConfig, signer: DigestSigner) -> Result<Self> {
        cfg.validate()?;

        let connection = Arc::new(ConnectionManager::new(
            cfg.server.url.clone(),
            cfg.server.reconnect_cooldown(),
            Arc::new(signer),
        ));
        let client: Arc<dyn RequestClient> = connection.clone();

        let (feed_tx, feed) = attack_feed();
        let settings = ListenerSettings::from(&cfg.attack_listener);
        let pollers = cfg
            .players
            .iter()
            .filter(|p| p.services.attack_listener.enabled)
            .map(|p| {
                AccountPoller::new(
                    Arc::clone(&client),
                    p.identity(),
                    p.visibility.clone(),
                    settings,
                    feed_tx.clone(),
                )
            })
            .collect::<Vec<_>>();
        // Pollers hold the only senders, so the feed closes once they stop.
        drop(feed_tx);

        let status = StatusMonitor::new(
            Arc::clone(&client),
            cfg.players.clone(),
            cfg.status.request_timeout(),
        );
        let control = ControlClient::new(client, cfg.status.request_timeout());

        tracing::info!(
            players = cfg.players.len(),
            listeners = pollers.len(),
            "relay configured"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                connection,
                feed,
                pollers: Mutex::new(pollers),
                status,
                control,
                tasks: TaskRegistry::new(),
                started: AtomicBool::new(false),
            }),
        })
    }

    /// Spawn the connection loop and every listener. Later calls are no-ops.
    pub async fn start(&self) {
        if self.inner.started.swap(true, Ordering::SeqCst) {
            return;
        }
        let tasks = &self.inner.tasks;

        let connection = Arc::clone(&self.inner.connection);
        let token = tasks.token();
        tasks
            .spawn("connection", async move { connection.run(token).await })
            .await;

        let pollers = std::mem::take(&mut *self.inner.pollers.lock().await);
        for poller in pollers {
            let token = tasks.token();
            tasks.spawn("attack_listener", poller.run(token)).await;
        }
    }

    /// Cancel and join every task started by `start`.
    pub async fn shutdown(&self) {
        tracing::info!("relay shutting down");
        self.inner.tasks.shutdown().await;
    }

    pub fn cfg(&self) -> &RelayConfig {
        &self.inner.cfg
    }

    pub fn connection(&self) -> Arc<ConnectionManager> {
        Arc::clone(&self.inner.connection)
    }

    pub fn attack_feed(&self) -> &AttackFeed {
        &self.inner.feed
    }

    pub fn status_monitor(&self) -> &StatusMonitor {
        &self.inner.status
    }

    pub fn control(&self) -> &ControlClient {
        &self.inner.control
    }

    pub async fn running_tasks(&self) -> usize {
        self.inner.tasks.len().await
    }
}
