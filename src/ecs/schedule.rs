use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, ScheduleLabel, SystemSet};

use super::clock::advance_clock;

/// Schedule label for one contest tick (one second of contest time).
/// Run manually each tick via `app.world_mut().run_schedule(ContestTick)`.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContestTick;

/// Ordered phases within each contest tick.
///
/// Phases run in declaration order: PreUpdate < Update < PostUpdate < Reactions < Last.
/// Queued actions are drained in PreUpdate, the engines tick in Update, ownership
/// is synced between them in PostUpdate and notices go out in Reactions.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContestPhase {
    PreUpdate,
    Update,
    PostUpdate,
    Reactions,
    Last,
}

/// Per-engine system sets within `ContestPhase::Update`. Claims tick before sieges.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainSet {
    Claims,
    Sieges,
}

/// Build a configured `ContestTick` schedule with phase ordering.
pub fn configure_contest_schedule(executor: ExecutorKind) -> Schedule {
    let mut schedule = Schedule::new(ContestTick);
    schedule.set_executor_kind(executor);
    schedule.configure_sets(
        (
            ContestPhase::PreUpdate,
            ContestPhase::Update,
            ContestPhase::PostUpdate,
            ContestPhase::Reactions,
            ContestPhase::Last,
        )
            .chain(),
    );
    schedule.configure_sets(
        (DomainSet::Claims, DomainSet::Sieges)
            .chain()
            .in_set(ContestPhase::Update),
    );
    schedule.add_systems(advance_clock.in_set(ContestPhase::Last));
    schedule
}
