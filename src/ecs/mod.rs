pub mod app;
pub mod clock;
pub mod conditions;
pub mod messages;
pub mod plugin;
pub mod resources;
pub mod schedule;
pub mod systems;
pub mod test_helpers;

pub use app::{build_contest_app, build_contest_app_with_executor};
pub use clock::ContestClock;
pub use conditions::{claims_pending, minute_elapsed, sieges_pending};
pub use messages::{NoticeMessage, NoticeRecipient, OwnershipChanged, OwnershipSource};
pub use plugin::ContestPlugin;
pub use resources::{ActionInbox, ActionResults, ContestSettings, Directories};
pub use schedule::{ContestPhase, ContestTick, DomainSet, configure_contest_schedule};
pub use systems::actions::{
    ActionEffects, apply_action, claim_initiation_check, siege_declaration_check,
};
