use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use raidwatch_core::error::{Result, RaidwatchError};
use raidwatch_core::protocol::Identity;

const MIN_INTERVAL_MS: u64 = 100;
const MAX_INTERVAL_MS: u64 = 600_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    pub version: u32,

    pub server: ServerSection,

    #[serde(default)]
    pub attack_listener: AttackListenerSection,

    #[serde(default)]
    pub status: StatusSection,

    #[serde(default)]
    pub logging: LoggingSection,

    #[serde(default)]
    pub players: Vec<PlayerConfig>,
}

impl RelayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RaidwatchError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.attack_listener.validate()?;
        self.status.validate()?;

        let mut seen = HashSet::new();
        for p in &self.players {
            p.info.validate()?;
            if !seen.insert((p.info.username.as_str(), p.info.server.as_str())) {
                return Err(RaidwatchError::Config(format!(
                    "duplicate player {}@{}",
                    p.info.username, p.info.server
                )));
            }
        }

        Ok(())
    }
}

fn check_interval(name: &str, ms: u64) -> Result<()> {
    if !(MIN_INTERVAL_MS..=MAX_INTERVAL_MS).contains(&ms) {
        return Err(RaidwatchError::Config(format!(
            "{name} must be between {MIN_INTERVAL_MS} and {MAX_INTERVAL_MS}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub url: String,

    #[serde(default = "default_reconnect_cooldown_ms")]
    pub reconnect_cooldown_ms: u64,
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.url.starts_with("ws://") || self.url.starts_with("wss://")) {
            return Err(RaidwatchError::Config(
                "server.url must start with ws:// or wss://".into(),
            ));
        }
        check_interval("server.reconnect_cooldown_ms", self.reconnect_cooldown_ms)
    }

    pub fn reconnect_cooldown(&self) -> Duration {
        Duration::from_millis(self.reconnect_cooldown_ms)
    }
}

fn default_reconnect_cooldown_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttackListenerSection {
    #[serde(default = "default_request_cooldown_ms")]
    pub request_cooldown_ms: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_dedup_capacity")]
    pub dedup_capacity: usize,
}

impl Default for AttackListenerSection {
    fn default() -> Self {
        Self {
            request_cooldown_ms: default_request_cooldown_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            dedup_capacity: default_dedup_capacity(),
        }
    }
}

impl AttackListenerSection {
    pub fn validate(&self) -> Result<()> {
        check_interval("attack_listener.request_cooldown_ms", self.request_cooldown_ms)?;
        check_interval("attack_listener.request_timeout_ms", self.request_timeout_ms)?;
        if self.dedup_capacity == 0 {
            return Err(RaidwatchError::Config(
                "attack_listener.dedup_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn request_cooldown(&self) -> Duration {
        Duration::from_millis(self.request_cooldown_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_request_cooldown_ms() -> u64 {
    10_000
}
fn default_request_timeout_ms() -> u64 {
    10_000
}
fn default_dedup_capacity() -> usize {
    10_000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusSection {
    #[serde(default = "default_status_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for StatusSection {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_status_timeout_ms(),
        }
    }
}

impl StatusSection {
    pub fn validate(&self) -> Result<()> {
        check_interval("status.request_timeout_ms", self.request_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_status_timeout_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` wins when set.
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerConfig {
    pub info: PlayerInfo,

    #[serde(default)]
    pub services: ServicesConfig,

    /// Opaque routing scope handed through to the delivery side.
    #[serde(default)]
    pub visibility: Vec<u64>,
}

impl PlayerConfig {
    pub fn identity(&self) -> Identity {
        Identity::new(
            self.info.username.clone(),
            self.info.password.clone(),
            self.info.server.clone(),
        )
    }
}

#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerInfo {
    pub server: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for PlayerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerInfo")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl PlayerInfo {
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() || self.server.is_empty() || self.password.is_empty() {
            return Err(RaidwatchError::Config(
                "players[].info requires non-empty server, username and password".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServicesConfig {
    #[serde(default)]
    pub attack_listener: ServiceToggle,

    /// Carried for config compatibility; no storm search runs in the relay.
    #[serde(default)]
    pub storm_searcher: ServiceToggle,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceToggle {
    #[serde(default)]
    pub enabled: bool,
}
