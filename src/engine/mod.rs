pub mod claim;
pub mod config;
pub mod directory;
pub mod siege;

pub use claim::ClaimEngine;
pub use config::{ClaimConfig, ContestConfig, PointsCurve, SiegeConfig};
pub use directory::{Directory, Faction, Territory};
pub use siege::{SiegeEngine, reminder_due};
