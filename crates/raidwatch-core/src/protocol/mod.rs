//! Wire protocol for the game-side API server.
//!
//! - Outbound: a signed request frame `{"content": {...}, "digest": "<HEX>"}`
//!   whose `content` is the exact canonical JSON that was signed.
//! - Inbound: `{"content": {"response": any} | {"error": string}, "msg_id": int}`.
//!
//! Parsers return `RaidwatchError` instead of panicking so that a hostile or
//! buggy server cannot take the relay down.

pub mod canonical;
pub mod request;
pub mod response;
pub mod search;

pub use request::{Command, Identity, Request};
pub use response::{InboundFrame, ResponseContent};
pub use search::{MsgFilter, SearchArgs, SearchPage};
