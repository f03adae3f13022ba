//! In-memory directory for tests and demos.
//!
//! Factions and territories are shared `Arc` records with interior
//! mutability, so a test can move players around or disband a faction while
//! the directory is installed in a running app.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::engine::directory::{Directory, Faction, Territory};
use crate::model::{ContestNotice, FactionId, PlayerPresence, TerritoryId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
pub struct FactionRecord {
    id: FactionId,
    member_count: Mutex<usize>,
    online: Mutex<Vec<PlayerPresence>>,
    notices: Mutex<Vec<ContestNotice>>,
}

impl FactionRecord {
    fn new(id: FactionId, member_count: usize) -> Self {
        Self {
            id,
            member_count: Mutex::new(member_count),
            online: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
        }
    }

    pub fn set_member_count(&self, count: usize) {
        *lock(&self.member_count) = count;
    }

    /// Bring a player online as a member of this faction.
    pub fn join_online(&self, player: PlayerPresence) -> &Self {
        let player = player.in_faction(self.id);
        let mut online = lock(&self.online);
        online.retain(|p| p.name != player.name);
        online.push(player);
        self
    }

    pub fn leave(&self, player_name: &str) {
        lock(&self.online).retain(|p| p.name != player_name);
    }

    /// Move an online member to another territory (or out of every territory).
    pub fn move_to(&self, player_name: &str, territory_id: Option<TerritoryId>) {
        for player in lock(&self.online).iter_mut() {
            if player.name == player_name {
                player.territory_id = territory_id;
            }
        }
    }

    /// Drain the notices delivered so far.
    pub fn take_notices(&self) -> Vec<ContestNotice> {
        std::mem::take(&mut *lock(&self.notices))
    }
}

impl Faction for FactionRecord {
    fn id(&self) -> FactionId {
        self.id
    }

    fn member_count(&self) -> usize {
        *lock(&self.member_count)
    }

    fn online_members(&self) -> Vec<PlayerPresence> {
        lock(&self.online).clone()
    }

    fn notify(&self, notice: &ContestNotice) {
        lock(&self.notices).push(notice.clone());
    }
}

#[derive(Debug)]
pub struct TerritoryRecord {
    id: TerritoryId,
    level: u32,
    members: Mutex<BTreeSet<String>>,
    border: Mutex<BTreeSet<String>>,
}

impl TerritoryRecord {
    fn new(id: TerritoryId, level: u32) -> Self {
        Self {
            id,
            level,
            members: Mutex::new(BTreeSet::new()),
            border: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn add_member(&self, player_name: &str) -> &Self {
        lock(&self.members).insert(player_name.to_string());
        self
    }

    /// Replace the set of players currently standing on the border.
    pub fn set_border<'a>(&self, player_names: impl IntoIterator<Item = &'a str>) {
        *lock(&self.border) = player_names.into_iter().map(str::to_string).collect();
    }
}

impl Territory for TerritoryRecord {
    fn id(&self) -> TerritoryId {
        self.id
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn is_member(&self, player_name: &str) -> bool {
        lock(&self.members).contains(player_name)
    }

    fn is_border_position(&self, player: &PlayerPresence) -> bool {
        player.is_in(self.id) && lock(&self.border).contains(&player.name)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    factions: RwLock<BTreeMap<FactionId, Arc<FactionRecord>>>,
    territories: RwLock<BTreeMap<TerritoryId, Arc<TerritoryRecord>>>,
    broadcasts: Mutex<Vec<ContestNotice>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_faction(&self, id: FactionId, member_count: usize) -> Arc<FactionRecord> {
        let record = Arc::new(FactionRecord::new(id, member_count));
        self.factions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::clone(&record));
        record
    }

    pub fn add_territory(&self, id: TerritoryId, level: u32) -> Arc<TerritoryRecord> {
        let record = Arc::new(TerritoryRecord::new(id, level));
        self.territories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::clone(&record));
        record
    }

    pub fn remove_faction(&self, id: FactionId) {
        self.factions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    pub fn remove_territory(&self, id: TerritoryId) {
        self.territories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    pub fn faction_record(&self, id: FactionId) -> Option<Arc<FactionRecord>> {
        self.factions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn territory_record(&self, id: TerritoryId) -> Option<Arc<TerritoryRecord>> {
        self.territories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Drain the broadcasts delivered so far.
    pub fn take_broadcasts(&self) -> Vec<ContestNotice> {
        std::mem::take(&mut *lock(&self.broadcasts))
    }
}

impl Directory for InMemoryDirectory {
    fn faction(&self, id: FactionId) -> Option<Arc<dyn Faction>> {
        self.faction_record(id)
            .map(|record| record as Arc<dyn Faction>)
    }

    fn territory(&self, id: TerritoryId) -> Option<Arc<dyn Territory>> {
        self.territory_record(id)
            .map(|record| record as Arc<dyn Territory>)
    }

    fn broadcast(&self, notice: &ContestNotice) {
        lock(&self.broadcasts).push(notice.clone());
    }
}
