//! Outbound request envelope.
//!
//! A `Request` is immutable once built. `to_wire` renders the canonical
//! content block, signs exactly those bytes, and embeds them verbatim in the
//! outbound frame.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::{Map, Value};

use crate::auth::DigestSigner;
use crate::error::{Result, RaidwatchError};
use crate::protocol::canonical::to_canonical_string;

/// Commands understood by the API server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Info,
    Search,
    Send,
    Login,
    Disconnect,
    Reconnect,
}

impl Command {
    /// Control commands are signed with the process-wide control key
    /// instead of the account secret.
    pub fn is_privileged(self) -> bool {
        matches!(self, Command::Disconnect | Command::Reconnect)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Command::Info => "info",
            Command::Search => "search",
            Command::Send => "send",
            Command::Login => "login",
            Command::Disconnect => "disconnect",
            Command::Reconnect => "reconnect",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account identity on a game server partition.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    /// Account secret; keys the request MAC. Never sent on the wire.
    pub password: String,
    pub server: String,
}

impl Identity {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        server: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            server: server.into(),
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("server", &self.server)
            .finish()
    }
}

/// One outbound command.
#[derive(Debug, Clone)]
pub struct Request {
    identity: Identity,
    command: Command,
    args: Map<String, Value>,
    timestamp: f64,
    msg_id: u64,
}

/// Signed content block. Field order is part of the canonical form.
#[derive(Serialize)]
struct Content<'a> {
    username: &'a str,
    server: &'a str,
    command: Command,
    args: &'a Map<String, Value>,
    timestamp: f64,
    msg_id: u64,
}

#[derive(Serialize)]
struct OutboundFrame<'a> {
    content: &'a RawValue,
    digest: &'a str,
}

impl Request {
    pub fn new(
        identity: Identity,
        command: Command,
        args: Map<String, Value>,
        timestamp: f64,
        msg_id: u64,
    ) -> Self {
        Self {
            identity,
            command,
            args,
            timestamp,
            msg_id,
        }
    }

    /// Canonical JSON of the content block (the bytes that get signed).
    pub fn content_json(&self) -> Result<String> {
        if !self.timestamp.is_finite() {
            return Err(RaidwatchError::Encode("timestamp must be finite".into()));
        }
        to_canonical_string(&Content {
            username: &self.identity.username,
            server: &self.identity.server,
            command: self.command,
            args: &self.args,
            timestamp: self.timestamp,
            msg_id: self.msg_id,
        })
    }

    /// Build the full outbound frame text.
    pub fn to_wire(&self, signer: &DigestSigner) -> Result<String> {
        let content = self.content_json()?;
        let digest = signer.digest(self.command, content.as_bytes(), &self.identity.password)?;
        let raw = RawValue::from_string(content)
            .map_err(|e| RaidwatchError::Encode(format!("content is not json: {e}")))?;
        to_canonical_string(&OutboundFrame {
            content: &raw,
            digest: &digest,
        })
    }
}
