//! Inbound response frames.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, RaidwatchError};

/// Content of one response: either a payload or an application error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseContent {
    Response(Value),
    Error(String),
}

impl ResponseContent {
    /// Payload, or `RaidwatchError::Server` for an error response.
    pub fn into_result(self) -> Result<Value> {
        match self {
            ResponseContent::Response(v) => Ok(v),
            ResponseContent::Error(e) => Err(RaidwatchError::Server(e)),
        }
    }
}

/// One inbound frame, correlated to its request by `msg_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    pub content: ResponseContent,
    pub msg_id: u64,
}

impl InboundFrame {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| RaidwatchError::Decode(format!("invalid inbound frame: {e}")))
    }

    pub fn parse_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| RaidwatchError::Decode(format!("invalid inbound frame: {e}")))
    }
}
