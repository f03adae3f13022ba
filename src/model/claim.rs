use serde::{Deserialize, Serialize};

use super::presence::FactionId;

/// Peaceful capture attempt on one territory.
///
/// Contester and progress live in one record, so progress can never outlive
/// the contest it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimState {
    pub contester_id: FactionId,
    pub progress: f64,
    /// Progress was pushed since the last minute tick. Consumed by that tick.
    #[serde(skip)]
    pub active: bool,
}

impl ClaimState {
    pub fn new(contester_id: FactionId) -> Self {
        Self {
            contester_id,
            progress: 0.0,
            active: false,
        }
    }
}

/// What a single progress application did to a claim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClaimProgress {
    /// Progress reached 1.0; the contester now owns the territory.
    Captured {
        faction_id: FactionId,
        previous_owner: Option<FactionId>,
    },
    /// Progress fell to zero or below; the contest is gone.
    Lapsed { faction_id: FactionId },
    /// Still in progress.
    Advanced { progress: f64 },
    /// No contest on that territory.
    NotContested,
    /// The delta was NaN or infinite; the claim is untouched.
    InvalidDelta,
}
