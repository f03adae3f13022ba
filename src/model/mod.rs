pub mod action;
pub mod claim;
pub mod notice;
pub mod presence;
pub mod siege;
pub mod snapshot;
pub mod timestamp;

pub use action::{ActionOutcome, ActionResult, ContestAction, RejectReason};
pub use claim::{ClaimProgress, ClaimState};
pub use notice::{ContestNotice, SiegeSide};
pub use presence::{FactionId, PlayerPresence, TerritoryId};
pub use siege::{ReminderPhase, SiegeEvent, SiegeState};
pub use snapshot::{ClaimSnapshot, DeclarationRecord, SiegeSnapshot};
pub use timestamp::WallTime;
