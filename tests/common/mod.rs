#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use territory_contest::engine::ContestConfig;
use territory_contest::model::{FactionId, PlayerPresence, TerritoryId, WallTime};
use territory_contest::testutil::{FactionRecord, InMemoryDirectory};
use territory_contest::{ContestRuntime, SnapshotPaths};

pub const KEEP: TerritoryId = 1;
pub const OUTPOST: TerritoryId = 2;

pub const RED: FactionId = 10;
pub const BLUE: FactionId = 20;
pub const GREEN: FactionId = 30;

/// Two territories and three factions, each large enough to claim.
pub struct Arena {
    pub directory: Arc<InMemoryDirectory>,
    pub red: Arc<FactionRecord>,
    pub blue: Arc<FactionRecord>,
    pub green: Arc<FactionRecord>,
}

impl Arena {
    pub fn new() -> Self {
        let directory = Arc::new(InMemoryDirectory::new());
        directory.add_territory(KEEP, 0).add_member("steward");
        directory.add_territory(OUTPOST, 4);
        let red = directory.add_faction(RED, 3);
        let blue = directory.add_faction(BLUE, 5);
        let green = directory.add_faction(GREEN, 3);
        Self {
            directory,
            red,
            blue,
            green,
        }
    }

    pub fn runtime(&self, config: ContestConfig, dir: &Path, start: WallTime) -> ContestRuntime {
        ContestRuntime::load(
            config,
            self.directory.clone(),
            SnapshotPaths::in_dir(dir),
            start,
        )
    }
}

pub fn member(name: &str, faction_id: FactionId, territory_id: TerritoryId) -> PlayerPresence {
    PlayerPresence::new(name)
        .in_faction(faction_id)
        .standing_in(territory_id)
}

pub fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}
