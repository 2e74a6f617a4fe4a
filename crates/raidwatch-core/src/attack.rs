//! Incoming-attack notifications.
//!
//! A raw `gam` entry is a `%`-delimited string whose sixth field is JSON:
//! `{"O": [players...], "M": [movements...]}`. Each movement is decoded on its
//! own; a malformed movement is dropped without affecting its neighbours.
//! Movements carrying neither `GS` nor `GA` are not threats and are skipped.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, RaidwatchError};

const FIELD_DELIMITER: char = '%';
const PAYLOAD_FIELD: usize = 5;

/// Troop estimate sentinel used by the game when no scout report exists.
const NO_ESTIMATE: i64 = -1;

/// One castle taking part in a movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Castle {
    pub x: i64,
    pub y: i64,
    pub name: String,
    pub owner: String,
}

/// Decoded incoming attack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackRecord {
    pub id: i64,
    /// Seconds until impact.
    pub remaining_secs: i64,
    pub target: Castle,
    pub attacker: Castle,
    pub estimated_troops: Option<i64>,
}

impl fmt::Display for AttackRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Incoming attack in approx. {} at \"{}\" of \"{}\" ({}:{}) from \"{}\" of \"{}\" ({}:{})",
            compound_duration(self.remaining_secs),
            self.target.name,
            self.target.owner,
            self.target.x,
            self.target.y,
            self.attacker.name,
            self.attacker.owner,
            self.attacker.x,
            self.attacker.y,
        )?;
        if let Some(count) = self.estimated_troops {
            write!(f, " with approx. {count} troop(s)")?;
        }
        Ok(())
    }
}

/// Render seconds as `"1h 2m 3s"`, dropping leading zero units.
/// Negative input renders as `"0s"`.
pub fn compound_duration(secs: i64) -> String {
    let secs = secs.max(0);
    let h = secs / 3600;
    let m = (secs / 60) % 60;
    let s = secs % 60;
    if h != 0 {
        format!("{h}h {m}m {s}s")
    } else if m != 0 {
        format!("{m}m {s}s")
    } else {
        format!("{s}s")
    }
}

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(rename = "O")]
    players: Vec<Value>,
    #[serde(rename = "M")]
    movements: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct PlayerEntry {
    #[serde(rename = "OID")]
    id: i64,
    #[serde(rename = "N")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct MovementEntry {
    #[serde(rename = "GS", default)]
    estimated: Option<i64>,
    #[serde(rename = "M")]
    movement: Movement,
}

#[derive(Debug, Deserialize)]
struct Movement {
    #[serde(rename = "MID")]
    id: i64,
    #[serde(rename = "TT")]
    total_time: i64,
    #[serde(rename = "PT")]
    passed_time: i64,
    #[serde(rename = "TID")]
    target_owner: i64,
    #[serde(rename = "OID")]
    attacker_owner: i64,
    #[serde(rename = "TA")]
    target_area: Vec<Value>,
    #[serde(rename = "SA")]
    source_area: Vec<Value>,
}

/// Decode every attack in one raw entry.
///
/// Structural failure of the entry itself yields an error; failures inside a
/// single movement only drop that movement.
pub fn decode_entry(raw: &str) -> Result<Vec<AttackRecord>> {
    let field = raw
        .split(FIELD_DELIMITER)
        .nth(PAYLOAD_FIELD)
        .ok_or_else(|| RaidwatchError::Decode("entry has too few fields".into()))?;
    let payload: Payload = serde_json::from_str(field)
        .map_err(|e| RaidwatchError::Decode(format!("entry payload: {e}")))?;

    let players: HashMap<i64, String> = payload
        .players
        .into_iter()
        .filter_map(|p| serde_json::from_value::<PlayerEntry>(p).ok())
        .map(|p| (p.id, p.name))
        .collect();

    let mut records = Vec::new();
    for movement in &payload.movements {
        match decode_movement(movement, &players) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => tracing::debug!(error = %e, "dropping malformed movement"),
        }
    }
    Ok(records)
}

/// Decode a batch of raw entries as returned in a search page, dropping the
/// ones that fail (including entries that are not strings at all).
pub fn decode_batch(entries: &[Value]) -> Vec<AttackRecord> {
    let mut records = Vec::new();
    for entry in entries {
        let Some(raw) = entry.as_str() else {
            tracing::debug!(entry = %entry, "dropping non-string entry");
            continue;
        };
        match decode_entry(raw) {
            Ok(decoded) => records.extend(decoded),
            Err(e) => tracing::debug!(error = %e, "dropping malformed entry"),
        }
    }
    records
}

/// `Ok(None)` when the movement is not a threat.
fn decode_movement(value: &Value, players: &HashMap<i64, String>) -> Result<Option<AttackRecord>> {
    let obj = value
        .as_object()
        .ok_or_else(|| RaidwatchError::Decode("movement is not an object".into()))?;
    if !(obj.contains_key("GS") || obj.contains_key("GA")) {
        return Ok(None);
    }

    let entry = MovementEntry::deserialize(value)
        .map_err(|e| RaidwatchError::Decode(format!("movement: {e}")))?;
    let m = entry.movement;

    let target = castle(&m.target_area, players, m.target_owner)?;
    let attacker = castle(&m.source_area, players, m.attacker_owner)?;

    let remaining_secs = m.total_time.checked_sub(m.passed_time).ok_or_else(|| {
        RaidwatchError::Decode(format!(
            "movement {}: TT {} - PT {} overflows",
            m.id, m.total_time, m.passed_time
        ))
    })?;

    Ok(Some(AttackRecord {
        id: m.id,
        remaining_secs,
        target,
        attacker,
        estimated_troops: entry.estimated.filter(|&n| n != NO_ESTIMATE),
    }))
}

fn castle(area: &[Value], players: &HashMap<i64, String>, owner_id: i64) -> Result<Castle> {
    let coord = |i: usize| {
        area.get(i)
            .and_then(Value::as_i64)
            .ok_or_else(|| RaidwatchError::Decode(format!("area[{i}] is not an integer")))
    };
    let name = area
        .get(10)
        .and_then(Value::as_str)
        .ok_or_else(|| RaidwatchError::Decode("area[10] is not a string".into()))?;
    let owner = players
        .get(&owner_id)
        .ok_or_else(|| RaidwatchError::Decode(format!("unknown player {owner_id}")))?;

    Ok(Castle {
        x: coord(1)?,
        y: coord(2)?,
        name: name.to_string(),
        owner: owner.clone(),
    })
}
