use bevy_ecs::resource::Resource;
use bevy_ecs::system::ResMut;

use crate::model::WallTime;

/// Ticks per minute tick. One schedule run is one second.
pub const TICKS_PER_MINUTE: u64 = 60;

/// Contest clock resource: the wall time systems see this tick, plus a tick
/// counter that drives the minute cadence.
///
/// `advance_clock` runs in `ContestPhase::Last`, so every system in a tick sees
/// the same instant. A live runtime overrides the time with `sync_to` before
/// each tick; the counter is never reset.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContestClock {
    pub time: WallTime,
    pub tick_count: u64,
}

impl ContestClock {
    pub fn new(start: WallTime) -> Self {
        Self {
            time: start,
            tick_count: 0,
        }
    }

    /// Advance the clock by one second.
    pub fn advance(&mut self) {
        self.time = self.time.plus_seconds(1);
        self.tick_count += 1;
    }

    pub fn sync_to(&mut self, now: WallTime) {
        self.time = now;
    }

    /// True on the last second of every minute of ticking.
    pub fn is_minute_tick(&self) -> bool {
        self.tick_count % TICKS_PER_MINUTE == TICKS_PER_MINUTE - 1
    }
}

/// Moves the clock forward one second at the end of each tick.
pub fn advance_clock(mut clock: ResMut<ContestClock>) {
    clock.advance();
}
