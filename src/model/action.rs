//! Action types for the contest action queue.
//!
//! The event layer queues `ContestAction`s through the inbox; the schedule
//! drains them at the start of each tick and records an `ActionResult` per
//! action.

use std::fmt;

use super::claim::ClaimProgress;
use super::presence::{FactionId, PlayerPresence, TerritoryId};

#[derive(Debug, Clone, PartialEq)]
pub enum ContestAction {
    InitiateClaim {
        territory_id: TerritoryId,
        players: Vec<PlayerPresence>,
    },
    ProgressClaim {
        territory_id: TerritoryId,
        players: Vec<PlayerPresence>,
        amount: f64,
    },
    DeclareSiege {
        attacker_id: FactionId,
        territory_id: TerritoryId,
    },
    RemoveFaction {
        faction_id: FactionId,
    },
    RemoveTerritory {
        territory_id: TerritoryId,
    },
}

impl ContestAction {
    pub fn territory_id(&self) -> Option<TerritoryId> {
        match self {
            ContestAction::InitiateClaim { territory_id, .. }
            | ContestAction::ProgressClaim { territory_id, .. }
            | ContestAction::DeclareSiege { territory_id, .. }
            | ContestAction::RemoveTerritory { territory_id } => Some(*territory_id),
            ContestAction::RemoveFaction { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult {
    pub action: ContestAction,
    pub outcome: ActionOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Applied,
    Progressed(ClaimProgress),
    Rejected { reason: RejectReason },
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, ActionOutcome::Rejected { .. })
    }
}

/// Why a contest action was refused. These are policy results, not faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Nobody outside the territory's members is present, or several factions are.
    NoInitiatingFaction,
    AlreadyOwned,
    AlreadyContested,
    InsufficientMembers,
    SiegeInProgress,
    ClaimInProgress,
    AlreadyBesieged,
    NotEligible,
    /// Progress amount is NaN or infinite.
    InvalidAmount,
    UnknownFaction,
    UnknownTerritory,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::NoInitiatingFaction => "no single faction can initiate",
            RejectReason::AlreadyOwned => "territory already owned by that faction",
            RejectReason::AlreadyContested => "territory already contested",
            RejectReason::InsufficientMembers => "faction too small to claim",
            RejectReason::SiegeInProgress => "another faction is besieging the territory",
            RejectReason::ClaimInProgress => "another faction is claiming the territory",
            RejectReason::AlreadyBesieged => "territory already under siege",
            RejectReason::NotEligible => "claim cannot progress",
            RejectReason::InvalidAmount => "progress amount is not a finite number",
            RejectReason::UnknownFaction => "faction not found",
            RejectReason::UnknownTerritory => "territory not found",
        };
        f.write_str(text)
    }
}
