//! Connectivity status of monitored accounts.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde_json::Value;

use raidwatch_core::protocol::search::{info_args, CONNECTED_PROPERTY};
use raidwatch_core::protocol::{Command, Identity, ResponseContent};

use crate::config::PlayerConfig;
use crate::transport::RequestClient;

/// Stateless `info` probe. No retry; the caller picks the cadence.
#[derive(Clone)]
pub struct StatusProber {
    client: Arc<dyn RequestClient>,
}

impl StatusProber {
    pub fn new(client: Arc<dyn RequestClient>) -> Self {
        Self { client }
    }

    /// `Some(connected)` for a boolean answer; `None` for anything else
    /// (timeout, server error, non-boolean payload).
    pub async fn probe(&self, identity: &Identity, timeout: Duration) -> Option<bool> {
        let content = self
            .client
            .send_request(identity, Command::Info, info_args(CONNECTED_PROPERTY), timeout)
            .await?;
        match content {
            ResponseContent::Response(Value::Bool(connected)) => Some(connected),
            ResponseContent::Response(other) => {
                tracing::debug!(username = %identity.username, response = %other, "non-boolean status");
                None
            }
            ResponseContent::Error(e) => {
                tracing::debug!(username = %identity.username, error = %e, "status probe failed");
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStatus {
    pub username: String,
    pub server: String,
    pub connected: Option<bool>,
    pub attack_warnings: bool,
}

/// Probes every configured player for status displays.
pub struct StatusMonitor {
    prober: StatusProber,
    players: Vec<PlayerConfig>,
    timeout: Duration,
}

impl StatusMonitor {
    pub fn new(client: Arc<dyn RequestClient>, players: Vec<PlayerConfig>, timeout: Duration) -> Self {
        Self {
            prober: StatusProber::new(client),
            players,
            timeout,
        }
    }

    /// One `(status, routes)` pair per configured player, in config order.
    pub async fn get_status(&self) -> Vec<(PlayerStatus, Vec<u64>)> {
        join_all(self.players.iter().map(|p| async move {
            let connected = self.prober.probe(&p.identity(), self.timeout).await;
            let status = PlayerStatus {
                username: p.info.username.clone(),
                server: p.info.server.clone(),
                connected,
                attack_warnings: p.services.attack_listener.enabled,
            };
            (status, p.visibility.clone())
        }))
        .await
    }
}
