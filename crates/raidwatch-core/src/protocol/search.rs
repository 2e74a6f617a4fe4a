//! `search` and `info` argument/response shapes.

use serde::de::IgnoredAny;
use serde_json::{json, Map, Value};

use crate::error::{Result, RaidwatchError};

/// Message-type filter for `search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgFilter {
    /// No filter (used by the zero-length cursor probe).
    All,
    /// Incoming-attack notifications.
    Attacks,
}

impl MsgFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            MsgFilter::All => "",
            MsgFilter::Attacks => "gam",
        }
    }
}

/// Arguments of a `search` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchArgs {
    pub start_index: u64,
    pub msg_type: MsgFilter,
}

impl SearchArgs {
    /// Probe that learns the current cursor without consuming events.
    pub fn cursor_probe() -> Self {
        Self {
            start_index: 0,
            msg_type: MsgFilter::All,
        }
    }

    pub fn attacks_from(start_index: u64) -> Self {
        Self {
            start_index,
            msg_type: MsgFilter::Attacks,
        }
    }

    pub fn to_args(self) -> Map<String, Value> {
        let mut args = Map::new();
        args.insert("start_index".into(), json!(self.start_index));
        args.insert("msg_type".into(), json!(self.msg_type.as_str()));
        args
    }
}

/// Decoded `search` payload: `[raw_entries, next_index]`.
///
/// Entries stay raw JSON; each one is checked when the batch is decoded, so a
/// bad entry never costs the page its cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub entries: Vec<Value>,
    pub next_index: u64,
}

impl SearchPage {
    /// Rejects only payloads that are not a `[list, int]` pair.
    pub fn from_value(value: Value) -> Result<Self> {
        let (entries, next_index): (Vec<Value>, u64) = serde_json::from_value(value)
            .map_err(|e| RaidwatchError::Decode(format!("invalid search page: {e}")))?;
        Ok(Self {
            entries,
            next_index,
        })
    }

    /// Read only the cursor, ignoring whatever the entry list holds.
    pub fn cursor_of(value: Value) -> Result<u64> {
        let (_, next_index): (IgnoredAny, u64) = serde_json::from_value(value)
            .map_err(|e| RaidwatchError::Decode(format!("invalid search cursor: {e}")))?;
        Ok(next_index)
    }
}

/// Property name for the connectivity `info` query.
pub const CONNECTED_PROPERTY: &str = "connected";

pub fn info_args(name: &str) -> Map<String, Value> {
    let mut args = Map::new();
    args.insert("name".into(), json!(name));
    args
}
