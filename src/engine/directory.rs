//! Narrow views of the faction and territory directories.
//!
//! The engines only ever hold ids. Everything else is resolved through a
//! `Directory` at the moment it is needed, and any lookup may come back empty
//! because the entity was deleted in the meantime.

use std::sync::Arc;

use crate::model::{ContestNotice, FactionId, PlayerPresence, TerritoryId};

pub trait Faction: Send + Sync {
    fn id(&self) -> FactionId;

    /// Registered members, online or not.
    fn member_count(&self) -> usize;

    fn online_members(&self) -> Vec<PlayerPresence>;

    fn notify(&self, notice: &ContestNotice);
}

pub trait Territory: Send + Sync {
    fn id(&self) -> TerritoryId;

    /// Tier used by the claim decay lookup. Plain territories are level 0.
    fn level(&self) -> u32;

    fn is_member(&self, player_name: &str) -> bool;

    fn is_border_position(&self, player: &PlayerPresence) -> bool;
}

pub trait Directory: Send + Sync {
    fn faction(&self, id: FactionId) -> Option<Arc<dyn Faction>>;

    fn territory(&self, id: TerritoryId) -> Option<Arc<dyn Territory>>;

    /// Announce to every online player.
    fn broadcast(&self, notice: &ContestNotice);
}
