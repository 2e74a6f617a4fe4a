//! Scripted `RequestClient` shared by service tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use raidwatch_core::protocol::{Command, Identity, ResponseContent};
use raidwatch_relay::transport::RequestClient;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub username: String,
    pub command: Command,
    pub args: Map<String, Value>,
}

/// Replays queued responses in order; `None` entries simulate timeouts.
/// An exhausted script answers with `None`.
#[derive(Default)]
pub struct ScriptedClient {
    script: Mutex<VecDeque<Option<ResponseContent>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedClient {
    pub fn new(script: Vec<Option<ResponseContent>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request with `content`.
    pub fn constant(content: ResponseContent, times: usize) -> Self {
        Self::new(vec![Some(content); times])
    }

    pub fn push(&self, response: Option<ResponseContent>) {
        self.script.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RequestClient for ScriptedClient {
    async fn send_request(
        &self,
        identity: &Identity,
        command: Command,
        args: Map<String, Value>,
        _timeout: Duration,
    ) -> Option<ResponseContent> {
        self.calls.lock().unwrap().push(RecordedCall {
            username: identity.username.clone(),
            command,
            args,
        });
        self.script.lock().unwrap().pop_front().flatten()
    }
}

pub fn ok(value: Value) -> Option<ResponseContent> {
    Some(ResponseContent::Response(value))
}

pub fn err(msg: &str) -> Option<ResponseContent> {
    Some(ResponseContent::Error(msg.to_string()))
}

/// Raw `gam` entry holding one attack with the given movement id.
pub fn attack_entry(id: i64) -> String {
    let payload = serde_json::json!({
        "O": [{"OID": 1, "N": "Defender"}, {"OID": 2, "N": "Raider"}],
        "M": [{
            "GS": 120,
            "M": {
                "MID": id,
                "TT": 600,
                "PT": 60,
                "TID": 1,
                "OID": 2,
                "TA": [0, 10, 20, 0, 0, 0, 0, 0, 0, 0, "Keep"],
                "SA": [0, 30, 40, 0, 0, 0, 0, 0, 0, 0, "Camp"]
            }
        }]
    });
    format!("gam%0%1%0%0%{payload}")
}
