use std::fmt;

use super::presence::{FactionId, TerritoryId};

/// Which side of a siege a notice is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiegeSide {
    Attacking,
    Defending,
}

/// Messages the engines hand to factions (or to everyone) when a contest
/// moves. Rendering them for players is up to the embedding layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ContestNotice {
    TerritoryClaimed {
        territory_id: TerritoryId,
        faction_id: FactionId,
        previous_owner: Option<FactionId>,
    },
    SiegeReminder {
        territory_id: TerritoryId,
        side: SiegeSide,
        remaining_minutes: i64,
    },
    SiegeWon {
        territory_id: TerritoryId,
        side: SiegeSide,
    },
    SiegeLost {
        territory_id: TerritoryId,
        side: SiegeSide,
    },
}

impl ContestNotice {
    pub fn territory_id(&self) -> TerritoryId {
        match self {
            ContestNotice::TerritoryClaimed { territory_id, .. }
            | ContestNotice::SiegeReminder { territory_id, .. }
            | ContestNotice::SiegeWon { territory_id, .. }
            | ContestNotice::SiegeLost { territory_id, .. } => *territory_id,
        }
    }
}

impl fmt::Display for ContestNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContestNotice::TerritoryClaimed {
                territory_id,
                faction_id,
                ..
            } => write!(f, "faction {faction_id} claimed territory {territory_id}"),
            ContestNotice::SiegeReminder {
                territory_id,
                side,
                remaining_minutes,
            } => {
                let verb = match side {
                    SiegeSide::Attacking => "attack on",
                    SiegeSide::Defending => "defence of",
                };
                if *remaining_minutes > 0 {
                    write!(
                        f,
                        "{verb} territory {territory_id} begins in {remaining_minutes} minutes"
                    )
                } else {
                    write!(f, "{verb} territory {territory_id} is under way")
                }
            }
            ContestNotice::SiegeWon { territory_id, side } => match side {
                SiegeSide::Attacking => write!(f, "territory {territory_id} was taken"),
                SiegeSide::Defending => write!(f, "territory {territory_id} was held"),
            },
            ContestNotice::SiegeLost { territory_id, side } => match side {
                SiegeSide::Attacking => write!(f, "the siege of territory {territory_id} failed"),
                SiegeSide::Defending => write!(f, "territory {territory_id} was lost"),
            },
        }
    }
}
