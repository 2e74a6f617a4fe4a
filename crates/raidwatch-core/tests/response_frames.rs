//! Inbound frame and search page parsing.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use raidwatch_core::protocol::{InboundFrame, ResponseContent, SearchArgs, SearchPage};

#[test]
fn parses_success_and_error_frames() {
    let ok = InboundFrame::parse(r#"{"content": {"response": [["a"], 6]}, "msg_id": 11}"#).unwrap();
    assert_eq!(ok.msg_id, 11);
    assert_eq!(ok.content, ResponseContent::Response(json!([["a"], 6])));

    let err = InboundFrame::parse_slice(br#"{"content": {"error": "x"}, "msg_id": 2}"#).unwrap();
    assert_eq!(err.content, ResponseContent::Error("x".into()));
    assert_eq!(err.content.into_result().unwrap_err().kind().as_str(), "SERVER");
}

#[test]
fn rejects_frames_without_msg_id_or_content() {
    assert!(InboundFrame::parse(r#"{"content": {"response": 1}}"#).is_err());
    assert!(InboundFrame::parse(r#"{"msg_id": 1}"#).is_err());
    assert!(InboundFrame::parse(r#"{"content": {"other": 1}, "msg_id": 1}"#).is_err());
    assert!(InboundFrame::parse("not json").is_err());
}

#[test]
fn search_page_requires_entries_and_index() {
    let page = SearchPage::from_value(json!([["m1", "m2"], 8])).unwrap();
    assert_eq!(page.entries, vec![json!("m1"), json!("m2")]);
    assert_eq!(page.next_index, 8);

    // Odd entries are left for the batch decoder; the cursor still counts.
    let page = SearchPage::from_value(json!([["m1", 42, null], 9])).unwrap();
    assert_eq!(page.entries.len(), 3);
    assert_eq!(page.next_index, 9);

    assert!(SearchPage::from_value(json!(["m1", 8])).is_err());
    assert!(SearchPage::from_value(json!([["m1"], -1])).is_err());
    assert!(SearchPage::from_value(json!([["m1"], "8"])).is_err());
    assert!(SearchPage::from_value(json!({"entries": []})).is_err());
}

#[test]
fn cursor_probe_ignores_entry_shape() {
    assert_eq!(SearchPage::cursor_of(json!([[{"any": 1}], 5])).unwrap(), 5);
    assert!(SearchPage::cursor_of(json!([[], null])).is_err());
}

#[test]
fn search_args_shape() {
    let probe = SearchArgs::cursor_probe().to_args();
    assert_eq!(json!(probe), json!({"start_index": 0, "msg_type": ""}));
    let poll = SearchArgs::attacks_from(42).to_args();
    assert_eq!(json!(poll), json!({"start_index": 42, "msg_type": "gam"}));
}
