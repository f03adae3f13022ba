use std::sync::Arc;

use bevy_app::App;
use bevy_ecs::message::MessageRegistry;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs};

use super::clock::ContestClock;
use super::messages::{NoticeMessage, OwnershipChanged};
use super::plugin::ContestPlugin;
use super::resources::{ActionInbox, ContestSettings, Directories};
use super::schedule::{ContestPhase, configure_contest_schedule};
use crate::engine::{ClaimEngine, ContestConfig, Directory, SiegeEngine};
use crate::model::WallTime;

/// Build a headless Bevy app holding both engines, the contest clock and
/// every contest system, on a single-threaded executor.
///
/// Manual tick control:
/// ```no_run
/// # use std::sync::Arc;
/// # use territory_contest::ecs::{build_contest_app, ContestTick};
/// # use territory_contest::engine::{ClaimEngine, ContestConfig, SiegeEngine};
/// # use territory_contest::model::WallTime;
/// # use territory_contest::testutil::InMemoryDirectory;
/// let mut app = build_contest_app(
///     ContestConfig::default(),
///     Arc::new(InMemoryDirectory::new()),
///     ClaimEngine::new(),
///     SiegeEngine::new(),
///     WallTime::now(),
/// );
/// for _ in 0..3_600 {  // one hour of second ticks
///     app.world_mut().run_schedule(ContestTick);
/// }
/// ```
pub fn build_contest_app(
    config: ContestConfig,
    directory: Arc<dyn Directory>,
    claims: ClaimEngine,
    sieges: SiegeEngine,
    start: WallTime,
) -> App {
    build_contest_app_with_executor(
        config,
        directory,
        claims,
        sieges,
        start,
        ExecutorKind::SingleThreaded,
    )
}

/// Build the contest app with a specific executor kind.
pub fn build_contest_app_with_executor(
    config: ContestConfig,
    directory: Arc<dyn Directory>,
    claims: ClaimEngine,
    sieges: SiegeEngine,
    start: WallTime,
    executor: ExecutorKind,
) -> App {
    let mut app = App::empty();

    // Core resources
    app.insert_resource(ContestClock::new(start));
    app.insert_resource(ContestSettings(config.sanitized()));
    app.insert_resource(Directories(directory));
    app.insert_resource(claims);
    app.insert_resource(sieges);
    app.insert_resource(ActionInbox::new());

    // Register message types
    MessageRegistry::register_message::<NoticeMessage>(app.world_mut());
    MessageRegistry::register_message::<OwnershipChanged>(app.world_mut());

    // Build schedule with message rotation
    let mut schedule = configure_contest_schedule(executor);
    schedule.add_systems(bevy_ecs::message::message_update_system.in_set(ContestPhase::PreUpdate));
    app.add_schedule(schedule);
    app.add_plugins(ContestPlugin);
    app
}
