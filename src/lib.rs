pub mod db;
pub mod ecs;
pub mod engine;
pub mod flush;
pub mod model;
pub mod runtime;
pub mod testutil;

pub use engine::{ClaimEngine, ContestConfig, Directory, Faction, SiegeEngine, Territory};
pub use model::{
    ActionOutcome, ClaimProgress, ContestAction, ContestNotice, FactionId, PlayerPresence,
    RejectReason, TerritoryId, WallTime,
};
pub use runtime::{ContestRuntime, SnapshotPaths};
