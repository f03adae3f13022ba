use serde::{Deserialize, Serialize};

use super::presence::{FactionId, TerritoryId};
use super::timestamp::WallTime;

/// A declared war against one territory.
///
/// Attacker and declaration instant are written together and live in the same
/// record; one never exists without the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiegeState {
    pub attacker_id: FactionId,
    pub declared_at: WallTime,
    /// Symmetric: `>= 1.0` the attacker wins, `<= -1.0` the defender wins.
    pub progress: f64,
    #[serde(skip)]
    pub attacker_count: usize,
    #[serde(skip)]
    pub defender_count: usize,
    /// Elapsed minute last seen by the reminder check.
    #[serde(skip)]
    pub last_reminder_minute: Option<i64>,
    /// A missing faction or territory was already logged for this siege.
    #[serde(skip)]
    pub unresolved_reported: bool,
}

impl SiegeState {
    pub fn new(attacker_id: FactionId, declared_at: WallTime) -> Self {
        Self {
            attacker_id,
            declared_at,
            progress: 0.0,
            attacker_count: 0,
            defender_count: 0,
            last_reminder_minute: None,
            unresolved_reported: false,
        }
    }
}

/// Which reminder cadence applied when a reminder fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderPhase {
    InProgress,
    Approaching,
    Distant,
}

/// Something a siege second tick decided.
#[derive(Debug, Clone, PartialEq)]
pub enum SiegeEvent {
    Reminder {
        territory_id: TerritoryId,
        attacker_id: FactionId,
        defender_id: Option<FactionId>,
        remaining_minutes: i64,
        phase: ReminderPhase,
    },
    Succeeded {
        territory_id: TerritoryId,
        attacker_id: FactionId,
        defender_id: Option<FactionId>,
    },
    Failed {
        territory_id: TerritoryId,
        attacker_id: FactionId,
        defender_id: Option<FactionId>,
    },
}
