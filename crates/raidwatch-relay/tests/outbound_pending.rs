//! Send queue ordering and pending-call bookkeeping.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use raidwatch_core::protocol::ResponseContent;
use raidwatch_relay::transport::{OutboundQueue, PendingCalls};

#[tokio::test]
async fn queue_pops_lowest_msg_id_first() {
    let q = OutboundQueue::new();
    q.push(11, "b".into()).await;
    q.push(10, "a".into()).await;
    q.push(12, "c".into()).await;
    assert_eq!(q.len().await, 3);

    assert_eq!(q.pop().await, (10, "a".to_string()));
    assert_eq!(q.pop().await, (11, "b".to_string()));
    assert_eq!(q.pop().await, (12, "c".to_string()));
    assert!(q.is_empty().await);
}

#[tokio::test]
async fn pop_waits_for_push() {
    let q = Arc::new(OutboundQueue::new());
    let waiter = tokio::spawn({
        let q = Arc::clone(&q);
        async move { q.pop().await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!waiter.is_finished());

    q.push(3, "late".into()).await;
    assert_eq!(waiter.await.unwrap(), (3, "late".to_string()));
}

#[tokio::test]
async fn slot_receives_exactly_one_response() {
    let calls = PendingCalls::new();
    let mut slot = calls.register(10);
    assert!(calls.contains(10));

    assert!(calls.resolve(10, ResponseContent::Response(json!(1))));
    // Duplicate delivery for an already resolved id finds nothing.
    assert!(!calls.resolve(10, ResponseContent::Response(json!(2))));
    assert_eq!(slot.recv().await, Some(ResponseContent::Response(json!(1))));
    assert!(calls.is_empty());
}

#[tokio::test]
async fn out_of_order_responses_reach_their_own_callers() {
    let calls = PendingCalls::new();
    let mut first = calls.register(10);
    let mut second = calls.register(11);

    assert!(calls.resolve(11, ResponseContent::Response(json!("eleven"))));
    assert!(calls.resolve(10, ResponseContent::Error("ten".into())));

    assert_eq!(first.recv().await, Some(ResponseContent::Error("ten".into())));
    assert_eq!(second.recv().await, Some(ResponseContent::Response(json!("eleven"))));
}

#[test]
fn dropping_slot_deregisters_it() {
    let calls = PendingCalls::new();
    {
        let slot = calls.register(4);
        assert_eq!(slot.msg_id(), 4);
        assert_eq!(calls.len(), 1);
    }
    assert!(calls.is_empty());
    assert!(!calls.resolve(4, ResponseContent::Response(json!(null))));
}
