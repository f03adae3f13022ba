//! Persisted shapes of both engines.
//!
//! These mirror the on-disk JSON rather than the in-memory records: every
//! field is optional or defaulted so hand-edited files and older layouts still
//! parse. Validation into the live records happens in the engines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::presence::{FactionId, TerritoryId};
use super::timestamp::WallTime;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimSnapshot {
    pub owners: BTreeMap<TerritoryId, FactionId>,
    pub contesters: BTreeMap<TerritoryId, FactionId>,
    pub progress: BTreeMap<TerritoryId, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiegeSnapshot {
    pub owners: BTreeMap<TerritoryId, FactionId>,
    pub declarations: BTreeMap<TerritoryId, DeclarationRecord>,
    pub progress: BTreeMap<TerritoryId, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclarationRecord {
    pub attacker: Option<FactionId>,
    pub declared_at: Option<WallTime>,
}

impl DeclarationRecord {
    pub fn new(attacker: FactionId, declared_at: WallTime) -> Self {
        Self {
            attacker: Some(attacker),
            declared_at: Some(declared_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_parses_to_default() {
        let claims: ClaimSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(claims, ClaimSnapshot::default());
        let sieges: SiegeSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(sieges, SiegeSnapshot::default());
    }

    #[test]
    fn integer_keys_survive_json() {
        let mut snapshot = SiegeSnapshot::default();
        snapshot.owners.insert(7, 3);
        snapshot
            .declarations
            .insert(7, DeclarationRecord::new(4, WallTime::from_millis(9_000)));
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SiegeSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn declaration_without_timestamp_still_parses() {
        let json = r#"{"declarations": {"5": {"attacker": 2}}}"#;
        let snapshot: SiegeSnapshot = serde_json::from_str(json).unwrap();
        let record = &snapshot.declarations[&5];
        assert_eq!(record.attacker, Some(2));
        assert_eq!(record.declared_at, None);
    }
}
