//! Relay config loader (strict parsing).

pub mod schema;

use std::fs;

use raidwatch_core::error::{Result, RaidwatchError};

pub use schema::{
    AttackListenerSection, LoggingSection, PlayerConfig, PlayerInfo, RelayConfig, ServerSection,
    ServiceToggle, ServicesConfig, StatusSection,
};

pub fn load_from_file(path: &str) -> Result<RelayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RaidwatchError::Config(format!("read {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<RelayConfig> {
    let cfg: RelayConfig = serde_yaml::from_str(s)
        .map_err(|e| RaidwatchError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
