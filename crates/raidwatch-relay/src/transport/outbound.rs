//! Outbound send queue ordered by `msg_id`.
//!
//! Requests may be enqueued out of order by concurrent callers; the send loop
//! always takes the smallest pending `msg_id` first. The queue is unbounded.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tokio::sync::{Mutex, Notify};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Queued {
    msg_id: u64,
    wire: String,
}

#[derive(Default)]
pub struct OutboundQueue {
    heap: Mutex<BinaryHeap<Reverse<Queued>>>,
    notify: Notify,
}

impl OutboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, msg_id: u64, wire: String) {
        self.heap.lock().await.push(Reverse(Queued { msg_id, wire }));
        self.notify.notify_one();
    }

    /// Wait for and remove the frame with the lowest `msg_id`.
    pub async fn pop(&self) -> (u64, String) {
        loop {
            let notified = self.notify.notified();
            if let Some(Reverse(q)) = self.heap.lock().await.pop() {
                return (q.msg_id, q.wire);
            }
            notified.await;
        }
    }

    pub async fn len(&self) -> usize {
        self.heap.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.heap.lock().await.is_empty()
    }
}
