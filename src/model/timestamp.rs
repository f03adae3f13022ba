use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const SECONDS_PER_MINUTE: i64 = 60;
pub const MILLIS_PER_MINUTE: i64 = MILLIS_PER_SECOND * SECONDS_PER_MINUTE;

/// Wall-clock instant as milliseconds since the Unix epoch.
///
/// Serialized as a bare integer so persisted declarations stay readable and
/// hand-editable. Differences between two instants may be negative when the
/// host clock jumps backwards; callers decide how to treat that.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WallTime(i64);

impl WallTime {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn from_seconds(seconds: i64) -> Self {
        Self(seconds * MILLIS_PER_SECOND)
    }

    pub fn from_minutes(minutes: i64) -> Self {
        Self(minutes * MILLIS_PER_MINUTE)
    }

    /// Current system time. A clock set before 1970 reads as the epoch.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        Self(millis)
    }

    pub fn as_millis(self) -> i64 {
        self.0
    }

    pub fn plus_seconds(self, seconds: i64) -> Self {
        Self(self.0.saturating_add(seconds.saturating_mul(MILLIS_PER_SECOND)))
    }

    pub fn plus_minutes(self, minutes: i64) -> Self {
        Self(self.0.saturating_add(minutes.saturating_mul(MILLIS_PER_MINUTE)))
    }

    /// Raw elapsed milliseconds from `earlier` to `self` (negative if `earlier` is later).
    pub fn millis_since(self, earlier: WallTime) -> i64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Whole minutes elapsed since `earlier`, floor-divided.
    pub fn minutes_since(self, earlier: WallTime) -> i64 {
        self.millis_since(earlier).div_euclid(MILLIS_PER_MINUTE)
    }

    /// Whole seconds elapsed since `earlier`, floor-divided.
    pub fn seconds_since(self, earlier: WallTime) -> i64 {
        self.millis_since(earlier).div_euclid(MILLIS_PER_SECOND)
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
