//! Passive territory capture.
//!
//! A faction that stands in a territory unopposed slowly fills its claim
//! progress. Progress that is not pushed during a minute decays at a rate set
//! by the territory level, so a claim must be kept up or it falls back to
//! nothing.

use std::collections::BTreeMap;

use bevy_ecs::resource::Resource;

use super::config::ClaimConfig;
use super::directory::{Directory, Territory};
use crate::model::{
    ClaimProgress, ClaimSnapshot, ClaimState, FactionId, PlayerPresence, RejectReason,
    TerritoryId,
};

/// Highest progress a running contest can hold; 1.0 is a capture.
pub(crate) const PROGRESS_CEILING: f64 = 1.0 - f64::EPSILON;

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ClaimEngine {
    owners: BTreeMap<TerritoryId, FactionId>,
    claims: BTreeMap<TerritoryId, ClaimState>,
}

impl ClaimEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Persistence --

    /// Rebuild from a persisted snapshot, dropping anything that breaks the
    /// one-contest-per-territory invariants.
    pub fn from_snapshot(snapshot: ClaimSnapshot) -> Self {
        let ClaimSnapshot {
            owners,
            contesters,
            mut progress,
        } = snapshot;

        let mut claims = BTreeMap::new();
        for (territory_id, contester_id) in contesters {
            let stored = progress.remove(&territory_id);
            if owners.get(&territory_id) == Some(&contester_id) {
                tracing::error!(
                    territory_id,
                    faction_id = contester_id,
                    "claim contester already owns the territory, dropping contest"
                );
                continue;
            }
            let value = match stored {
                Some(value) if value.is_finite() => {
                    let clamped = value.clamp(0.0, PROGRESS_CEILING);
                    if clamped != value {
                        tracing::error!(
                            territory_id,
                            faction_id = contester_id,
                            progress = value,
                            clamped,
                            "claim progress out of range, clamping"
                        );
                    }
                    clamped
                }
                Some(value) => {
                    tracing::error!(
                        territory_id,
                        faction_id = contester_id,
                        progress = value,
                        "claim progress is not a number, dropping contest"
                    );
                    continue;
                }
                None => {
                    tracing::error!(
                        territory_id,
                        faction_id = contester_id,
                        "claim contester has no progress, restarting at zero"
                    );
                    0.0
                }
            };
            let mut state = ClaimState::new(contester_id);
            state.progress = value;
            claims.insert(territory_id, state);
        }

        for territory_id in progress.keys() {
            tracing::error!(territory_id, "claim progress without a contester, dropping");
        }

        Self { owners, claims }
    }

    pub fn to_snapshot(&self) -> ClaimSnapshot {
        ClaimSnapshot {
            owners: self.owners.clone(),
            contesters: self
                .claims
                .iter()
                .map(|(&territory_id, claim)| (territory_id, claim.contester_id))
                .collect(),
            progress: self
                .claims
                .iter()
                .map(|(&territory_id, claim)| (territory_id, claim.progress))
                .collect(),
        }
    }

    // -- Initiation --

    /// The one non-member faction present, if there is exactly one.
    ///
    /// Territory members and faction-less players are ignored. Two or more
    /// rival factions present means nobody can initiate.
    pub fn initiating_faction(
        territory: &dyn Territory,
        players: &[PlayerPresence],
    ) -> Option<FactionId> {
        let mut initiator = None;
        for player in players {
            if territory.is_member(&player.name) {
                continue;
            }
            let Some(faction_id) = player.faction_id else {
                continue;
            };
            match initiator {
                Some(existing) if existing != faction_id => return None,
                _ => initiator = Some(faction_id),
            }
        }
        initiator
    }

    /// Full initiation check, returning the faction that would become the
    /// contester.
    pub fn initiation_check(
        &self,
        territory: &dyn Territory,
        players: &[PlayerPresence],
        directory: &dyn Directory,
        config: &ClaimConfig,
    ) -> Result<FactionId, RejectReason> {
        let territory_id = territory.id();
        let initiator =
            Self::initiating_faction(territory, players).ok_or(RejectReason::NoInitiatingFaction)?;
        let owner = self.owner(territory_id);
        if owner == Some(initiator) {
            return Err(RejectReason::AlreadyOwned);
        }
        if self.is_contested(territory_id) {
            return Err(RejectReason::AlreadyContested);
        }

        if let Some(owner_id) = owner {
            let min = config.min_members_to_claim;
            let Some(initiating) = directory.faction(initiator) else {
                tracing::error!(
                    territory_id,
                    faction_id = initiator,
                    "failed to resolve initiating faction"
                );
                return Err(RejectReason::UnknownFaction);
            };
            if initiating.member_count() < min {
                return Err(RejectReason::InsufficientMembers);
            }
            let Some(owning) = directory.faction(owner_id) else {
                tracing::error!(
                    territory_id,
                    faction_id = owner_id,
                    "failed to resolve owning faction"
                );
                return Err(RejectReason::UnknownFaction);
            };
            if owning.member_count() < min {
                return Err(RejectReason::InsufficientMembers);
            }
        }

        Ok(initiator)
    }

    pub fn can_initiate(
        &self,
        territory: &dyn Territory,
        players: &[PlayerPresence],
        directory: &dyn Directory,
        config: &ClaimConfig,
    ) -> bool {
        self.initiation_check(territory, players, directory, config)
            .is_ok()
    }

    /// Start a contest at zero progress. Refuses (returns false) if the
    /// territory is already contested or already owned by `faction_id`.
    pub fn initiate(&mut self, territory_id: TerritoryId, faction_id: FactionId) -> bool {
        if self.is_contested(territory_id) || self.owner(territory_id) == Some(faction_id) {
            return false;
        }
        self.claims
            .insert(territory_id, ClaimState::new(faction_id));
        tracing::info!(territory_id, faction_id, "claim initiated");
        true
    }

    // -- Progress --

    /// The contesting faction is present and no rival faction is.
    pub fn can_progress(&self, territory_id: TerritoryId, players: &[PlayerPresence]) -> bool {
        let Some(contester_id) = self.contester(territory_id) else {
            return false;
        };
        let mut contesting_present = false;
        for player in players {
            match player.faction_id {
                Some(faction_id) if faction_id == contester_id => contesting_present = true,
                Some(_) => return false,
                None => {}
            }
        }
        contesting_present
    }

    /// Push claim progress by `delta` on behalf of present players.
    ///
    /// A non-finite delta is refused and leaves the claim as it was.
    pub fn apply_progress(&mut self, territory_id: TerritoryId, delta: f64) -> ClaimProgress {
        if !delta.is_finite() {
            tracing::error!(territory_id, delta, "refusing non-finite claim progress");
            return ClaimProgress::InvalidDelta;
        }
        self.modify_progress(territory_id, delta, true)
    }

    fn modify_progress(
        &mut self,
        territory_id: TerritoryId,
        delta: f64,
        mark_active: bool,
    ) -> ClaimProgress {
        let Some(claim) = self.claims.get_mut(&territory_id) else {
            return ClaimProgress::NotContested;
        };
        let progress = claim.progress + delta;
        let faction_id = claim.contester_id;

        if progress >= 1.0 {
            self.claims.remove(&territory_id);
            let previous_owner = self.owners.insert(territory_id, faction_id);
            tracing::info!(territory_id, faction_id, ?previous_owner, "territory claimed");
            ClaimProgress::Captured {
                faction_id,
                previous_owner,
            }
        } else if progress <= 0.0 {
            self.claims.remove(&territory_id);
            tracing::debug!(territory_id, faction_id, "claim lapsed");
            ClaimProgress::Lapsed { faction_id }
        } else {
            claim.progress = progress;
            if mark_active {
                claim.active = true;
            }
            ClaimProgress::Advanced { progress }
        }
    }

    // -- Ticking --

    /// Anything for the minute tick to do.
    pub fn needs_tick(&self) -> bool {
        !self.claims.is_empty()
    }

    /// Decay every contest that was not pushed since the previous minute tick.
    pub fn minute_tick(
        &mut self,
        directory: &dyn Directory,
        config: &ClaimConfig,
    ) -> Vec<(TerritoryId, ClaimProgress)> {
        let contested: Vec<TerritoryId> = self.claims.keys().copied().collect();
        let mut outcomes = Vec::new();

        for territory_id in contested {
            let Some(claim) = self.claims.get_mut(&territory_id) else {
                continue;
            };
            if claim.active {
                claim.active = false;
                continue;
            }
            let Some(territory) = directory.territory(territory_id) else {
                tracing::error!(territory_id, "failed to resolve contested territory");
                continue;
            };
            let decay = config.decay_speed(territory.level());
            let outcome = self.modify_progress(territory_id, -decay, false);
            tracing::debug!(territory_id, decay, ?outcome, "claim decayed");
            outcomes.push((territory_id, outcome));
        }

        outcomes
    }

    // -- Ownership --

    /// Record an owner decided elsewhere (a siege). A contest by the new owner
    /// is pointless and is cleared.
    pub fn set_owner(&mut self, territory_id: TerritoryId, faction_id: FactionId) {
        self.owners.insert(territory_id, faction_id);
        if self.contester(territory_id) == Some(faction_id) {
            self.claims.remove(&territory_id);
            tracing::info!(territory_id, faction_id, "claim cleared, contester became owner");
        }
    }

    pub fn remove_faction(&mut self, faction_id: FactionId) {
        self.owners.retain(|_, owner| *owner != faction_id);
        self.claims
            .retain(|_, claim| claim.contester_id != faction_id);
    }

    pub fn remove_territory(&mut self, territory_id: TerritoryId) {
        self.owners.remove(&territory_id);
        self.claims.remove(&territory_id);
    }

    // -- Queries --

    pub fn owner(&self, territory_id: TerritoryId) -> Option<FactionId> {
        self.owners.get(&territory_id).copied()
    }

    pub fn contester(&self, territory_id: TerritoryId) -> Option<FactionId> {
        self.claims
            .get(&territory_id)
            .map(|claim| claim.contester_id)
    }

    /// Current progress, or zero when uncontested.
    pub fn progress(&self, territory_id: TerritoryId) -> f64 {
        self.claims
            .get(&territory_id)
            .map_or(0.0, |claim| claim.progress)
    }

    pub fn is_contested(&self, territory_id: TerritoryId) -> bool {
        self.claims.contains_key(&territory_id)
    }

    pub fn claim(&self, territory_id: TerritoryId) -> Option<&ClaimState> {
        self.claims.get(&territory_id)
    }

    pub fn owned_territories(&self, faction_id: FactionId) -> Vec<TerritoryId> {
        self.owners
            .iter()
            .filter(|(_, owner)| **owner == faction_id)
            .map(|(&territory_id, _)| territory_id)
            .collect()
    }

    pub fn contested_territories(&self) -> Vec<TerritoryId> {
        self.claims.keys().copied().collect()
    }
}
