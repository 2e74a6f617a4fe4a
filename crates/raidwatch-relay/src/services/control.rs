use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};

use raidwatch_core::error::{Result, RaidwatchError};
use raidwatch_core::protocol::{Command, Identity};

use crate::transport::RequestClient;

/// Issues the privileged session commands. Requests are signed with the
/// control key rather than the account password.
#[derive(Clone)]
pub struct ControlClient {
    client: Arc<dyn RequestClient>,
    timeout: Duration,
}

impl ControlClient {
    pub fn new(client: Arc<dyn RequestClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Ask the server to drop the account's game session.
    pub async fn disconnect(&self, identity: &Identity) -> Result<Value> {
        self.issue(identity, Command::Disconnect).await
    }

    /// Ask the server to re-establish the account's game session.
    pub async fn reconnect(&self, identity: &Identity) -> Result<Value> {
        self.issue(identity, Command::Reconnect).await
    }

    async fn issue(&self, identity: &Identity, command: Command) -> Result<Value> {
        let content = self
            .client
            .send_request(identity, command, Map::new(), self.timeout)
            .await
            .ok_or(RaidwatchError::Timeout)?;
        let value = content.into_result()?;
        tracing::info!(username = %identity.username, server = %identity.server, %command, "control command accepted");
        Ok(value)
    }
}
