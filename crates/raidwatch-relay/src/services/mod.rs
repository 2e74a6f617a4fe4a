//! Account services built on the request client.
//!
//! - `attack_listener`: per-account polling state machine feeding one shared
//!   output queue of routing envelopes.
//! - `status`: connectivity probes for status displays.
//! - `control`: privileged disconnect/reconnect commands.

pub mod attack_listener;
pub mod control;
pub mod dedup;
pub mod status;

pub use attack_listener::{
    attack_feed, AccountPoller, AttackFeed, ListenerSettings, PollOutcome, PollerState,
    RoutingEnvelope,
};
pub use control::ControlClient;
pub use dedup::SeenEvents;
pub use status::{PlayerStatus, StatusMonitor, StatusProber};
