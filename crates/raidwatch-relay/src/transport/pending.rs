//! Pending-call registry: `msg_id -> single-slot response channel`.
//!
//! A slot is removed when its response is delivered, when the caller gives up
//! (timeout or cancellation, via `PendingSlot`'s drop), whichever comes first.
//! Late or duplicate frames for a removed slot find nothing and are dropped.

use dashmap::DashMap;
use tokio::sync::oneshot;

use raidwatch_core::protocol::ResponseContent;

#[derive(Default)]
pub struct PendingCalls {
    slots: DashMap<u64, oneshot::Sender<ResponseContent>>,
}

impl PendingCalls {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Register a slot for `msg_id`. Dropping the returned guard deregisters it.
    pub fn register(&self, msg_id: u64) -> PendingSlot<'_> {
        let (tx, rx) = oneshot::channel();
        self.slots.insert(msg_id, tx);
        PendingSlot {
            calls: self,
            msg_id,
            rx,
        }
    }

    /// Deliver `content` to the caller waiting on `msg_id`.
    /// Returns false when no such caller exists.
    pub fn resolve(&self, msg_id: u64, content: ResponseContent) -> bool {
        match self.slots.remove(&msg_id) {
            Some((_, tx)) => tx.send(content).is_ok(),
            None => false,
        }
    }

    pub fn contains(&self, msg_id: u64) -> bool {
        self.slots.contains_key(&msg_id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn remove(&self, msg_id: u64) {
        self.slots.remove(&msg_id);
    }
}

/// Caller side of one pending call.
pub struct PendingSlot<'a> {
    calls: &'a PendingCalls,
    msg_id: u64,
    rx: oneshot::Receiver<ResponseContent>,
}

impl PendingSlot<'_> {
    pub fn msg_id(&self) -> u64 {
        self.msg_id
    }

    /// Wait for the response; `None` if the slot was dropped without one.
    pub async fn recv(&mut self) -> Option<ResponseContent> {
        (&mut self.rx).await.ok()
    }
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        self.calls.remove(self.msg_id);
    }
}
