use serde::{Deserialize, Serialize};

/// Opaque faction id assigned by the faction directory.
pub type FactionId = u64;

/// Opaque territory (bundle) id assigned by the territory directory.
pub type TerritoryId = u64;

/// A player as seen by the contest engines: who they are, which faction they
/// belong to, and which territory they are standing in right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPresence {
    pub name: String,
    pub faction_id: Option<FactionId>,
    pub territory_id: Option<TerritoryId>,
}

impl PlayerPresence {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            faction_id: None,
            territory_id: None,
        }
    }

    pub fn in_faction(mut self, faction_id: FactionId) -> Self {
        self.faction_id = Some(faction_id);
        self
    }

    pub fn standing_in(mut self, territory_id: TerritoryId) -> Self {
        self.territory_id = Some(territory_id);
        self
    }

    pub fn is_in(&self, territory_id: TerritoryId) -> bool {
        self.territory_id == Some(territory_id)
    }
}
