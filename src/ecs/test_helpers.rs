use bevy_app::App;

use crate::ecs::clock::{ContestClock, TICKS_PER_MINUTE};
use crate::ecs::schedule::ContestTick;
use crate::model::WallTime;

/// Run `n` second ticks.
pub fn tick_seconds(app: &mut App, n: u64) {
    for _ in 0..n {
        app.world_mut().run_schedule(ContestTick);
    }
}

/// Run `n` minutes worth of second ticks.
pub fn tick_minutes(app: &mut App, n: u64) {
    tick_seconds(app, n * TICKS_PER_MINUTE);
}

/// Return the current contest time from the clock resource.
pub fn current_time(app: &App) -> WallTime {
    app.world().resource::<ContestClock>().time
}
