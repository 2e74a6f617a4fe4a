//! Attack entry decoding and rendering.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::{json, Value};

use raidwatch_core::attack::{compound_duration, decode_batch, decode_entry, AttackRecord, Castle};

fn players() -> Value {
    json!([
        {"OID": 10, "N": "Defender"},
        {"OID": 20, "N": "Raider"}
    ])
}

fn area(x: i64, y: i64, name: &str) -> Value {
    json!([0, x, y, 0, 0, 0, 0, 0, 0, 0, name])
}

fn movement(id: i64, gs: Option<i64>) -> Value {
    let mut m = json!({
        "M": {
            "MID": id,
            "TT": 3723 + 100,
            "PT": 100,
            "TID": 10,
            "OID": 20,
            "TA": area(1, 2, "Keep"),
            "SA": area(30, 40, "Camp"),
        }
    });
    match gs {
        Some(n) => m["GS"] = json!(n),
        None => m["GA"] = json!([]),
    }
    m
}

fn entry(movements: Vec<Value>) -> String {
    let payload = json!({"O": players(), "M": movements});
    format!("gam%1%0%0%0%{payload}")
}

#[test]
fn compound_duration_drops_leading_zero_units() {
    assert_eq!(compound_duration(0), "0s");
    assert_eq!(compound_duration(46), "46s");
    assert_eq!(compound_duration(120), "2m 0s");
    assert_eq!(compound_duration(283), "4m 43s");
    assert_eq!(compound_duration(3600), "1h 0m 0s");
    assert_eq!(compound_duration(3723), "1h 2m 3s");
    assert_eq!(compound_duration(86400), "24h 0m 0s");
    assert_eq!(compound_duration(-5), "0s");
}

#[test]
fn decodes_attack_with_estimate() {
    let records = decode_entry(&entry(vec![movement(77, Some(250))])).unwrap();
    assert_eq!(
        records,
        vec![AttackRecord {
            id: 77,
            remaining_secs: 3723,
            target: Castle { x: 1, y: 2, name: "Keep".into(), owner: "Defender".into() },
            attacker: Castle { x: 30, y: 40, name: "Camp".into(), owner: "Raider".into() },
            estimated_troops: Some(250),
        }]
    );
    assert_eq!(
        records[0].to_string(),
        "Incoming attack in approx. 1h 2m 3s at \"Keep\" of \"Defender\" (1:2) \
         from \"Camp\" of \"Raider\" (30:40) with approx. 250 troop(s)"
    );
}

#[test]
fn estimate_is_omitted_when_absent_or_sentinel() {
    let records = decode_entry(&entry(vec![movement(1, None), movement(2, Some(-1))])).unwrap();
    assert_eq!(records.len(), 2);
    for r in &records {
        assert_eq!(r.estimated_troops, None);
        assert!(!r.to_string().contains("troop"));
    }
}

#[test]
fn non_threat_movements_are_skipped() {
    let mut plain = movement(5, Some(3));
    plain.as_object_mut().unwrap().remove("GS");
    let records = decode_entry(&entry(vec![plain, movement(6, Some(3))])).unwrap();
    assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![6]);
}

#[test]
fn malformed_movement_does_not_abort_entry() {
    let mut missing_area = movement(8, Some(1));
    missing_area["M"].as_object_mut().unwrap().remove("TA");
    let mut unknown_owner = movement(9, Some(1));
    unknown_owner["M"]["OID"] = json!(999);
    let mut bad_coord = movement(11, Some(1));
    bad_coord["M"]["SA"] = json!([0, "x", 1]);

    let records = decode_entry(&entry(vec![
        missing_area,
        movement(10, Some(1)),
        unknown_owner,
        bad_coord,
        json!("garbage"),
    ]))
    .unwrap();
    assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![10]);
}

#[test]
fn malformed_entries_are_rejected() {
    assert!(decode_entry("only%three%fields").is_err());
    assert!(decode_entry("a%b%c%d%e%{not json").is_err());
    assert!(decode_entry("a%b%c%d%e%{\"O\": []}").is_err());
}

#[test]
fn batch_yields_one_record_per_well_formed_entry() {
    let entries = vec![
        json!(entry(vec![movement(1, Some(5))])),
        json!("broken"),
        json!(entry(vec![movement(2, None)])),
        json!(42),
        json!("a%b%c%d%e%[]"),
        json!({"not": "a string"}),
        json!(entry(vec![movement(3, Some(7))])),
    ];
    let records = decode_batch(&entries);
    assert_eq!(records.len(), 3);
    assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn overflowing_travel_time_drops_only_that_movement() {
    let mut huge = movement(4, Some(1));
    huge["M"]["TT"] = json!(i64::MAX);
    huge["M"]["PT"] = json!(-1);
    let mut tiny = movement(5, Some(1));
    tiny["M"]["TT"] = json!(i64::MIN);
    tiny["M"]["PT"] = json!(1);

    let records = decode_entry(&entry(vec![huge.clone(), movement(6, Some(1)), tiny])).unwrap();
    assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![6]);

    let records = decode_batch(&[json!(entry(vec![huge]))]);
    assert!(records.is_empty());
}
