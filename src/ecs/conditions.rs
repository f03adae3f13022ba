use bevy_ecs::system::Res;

use super::clock::ContestClock;
use crate::engine::{ClaimEngine, SiegeEngine};

// Bevy run condition functions (for use with `.run_if()`).

/// One full minute of second ticks has passed.
pub fn minute_elapsed(clock: Res<ContestClock>) -> bool {
    clock.is_minute_tick()
}

/// At least one territory is being claimed.
pub fn claims_pending(claims: Res<ClaimEngine>) -> bool {
    claims.needs_tick()
}

/// At least one siege is declared.
pub fn sieges_pending(sieges: Res<SiegeEngine>) -> bool {
    sieges.needs_tick()
}
