//! Decode-once codec for inbound WebSocket messages.
//!
//! - Text and Binary frames => `InboundFrame`
//! - Ping/Pong are answered by tungstenite itself; Close ends the receive loop

use tokio_tungstenite::tungstenite::Message;

use raidwatch_core::error::Result;
use raidwatch_core::protocol::InboundFrame;

#[derive(Debug)]
pub enum Inbound {
    Response(InboundFrame),
    Control,
    Close,
}

pub fn decode(msg: Message) -> Result<Inbound> {
    match msg {
        Message::Text(s) => InboundFrame::parse(s.as_str()).map(Inbound::Response),
        Message::Binary(b) => InboundFrame::parse_slice(&b).map(Inbound::Response),
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => Ok(Inbound::Control),
        Message::Close(_) => Ok(Inbound::Close),
    }
}
