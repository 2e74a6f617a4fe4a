//! Transport layer (WebSocket client).
//!
//! One long-lived duplex connection carries every request. Outbound frames are
//! written in `msg_id` order; inbound frames are routed back to their callers
//! through the pending-call registry.

pub mod codec;
pub mod connection;
pub mod outbound;
pub mod pending;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use raidwatch_core::protocol::{Command, Identity, ResponseContent};

pub use connection::{ConnState, ConnectionManager};
pub use outbound::OutboundQueue;
pub use pending::{PendingCalls, PendingSlot};

/// Correlating request/response client.
///
/// `None` means no response arrived within `timeout` (including requests lost
/// to a dropped connection); callers treat it as "no data this cycle".
#[async_trait]
pub trait RequestClient: Send + Sync {
    async fn send_request(
        &self,
        identity: &Identity,
        command: Command,
        args: Map<String, Value>,
        timeout: Duration,
    ) -> Option<ResponseContent>;
}
