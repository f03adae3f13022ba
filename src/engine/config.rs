use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::flush::PersistError;

/// Tunables for both engines. Every field has a default, so a partial JSON
/// file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContestConfig {
    pub claim: ClaimConfig,
    pub siege: SiegeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimConfig {
    /// Both the claimant and the current owner need at least this many members.
    pub min_members_to_claim: usize,
    /// Progress lost per idle minute, indexed by territory level. Levels past
    /// the end reuse the last entry.
    pub decay_per_level: Vec<f64>,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            min_members_to_claim: 3,
            decay_per_level: vec![0.05, 0.04, 0.03, 0.02, 0.01],
        }
    }
}

impl ClaimConfig {
    pub fn decay_speed(&self, level: u32) -> f64 {
        let index = usize::try_from(level).unwrap_or(usize::MAX);
        self.decay_per_level
            .get(index)
            .or_else(|| self.decay_per_level.last())
            .copied()
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiegeConfig {
    pub preparation_minutes: i64,
    /// Reminder cadence once the contest has started.
    pub in_progress_remind_interval: i64,
    /// Remaining minutes at or below which the short cadence applies.
    pub short_remind_start: i64,
    pub short_remind_interval: i64,
    pub long_remind_interval: i64,
    pub points: PointsCurve,
}

impl Default for SiegeConfig {
    fn default() -> Self {
        Self {
            preparation_minutes: 60,
            in_progress_remind_interval: 5,
            short_remind_start: 10,
            short_remind_interval: 5,
            long_remind_interval: 30,
            points: PointsCurve::default(),
        }
    }
}

impl SiegeConfig {
    pub fn points_per_second(&self, member_difference: i64) -> f64 {
        self.points.at(member_difference)
    }
}

/// Linear siege points per second, clamped symmetrically. Monotonic in the
/// attacker-minus-defender difference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsCurve {
    pub per_member: f64,
    pub max_per_second: f64,
}

impl Default for PointsCurve {
    fn default() -> Self {
        Self {
            per_member: 0.01,
            max_per_second: 0.05,
        }
    }
}

impl PointsCurve {
    pub fn at(&self, member_difference: i64) -> f64 {
        let raw = member_difference as f64 * self.per_member;
        raw.clamp(-self.max_per_second, self.max_per_second)
    }
}

impl ContestConfig {
    pub fn from_json_str(text: &str) -> Result<Self, PersistError> {
        let config: ContestConfig = serde_json::from_str(text)?;
        Ok(config.sanitized())
    }

    pub fn from_json_file(path: &Path) -> Result<Self, PersistError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Clamp values that would break the curves or the reminder arithmetic.
    pub fn sanitized(mut self) -> Self {
        for decay in &mut self.claim.decay_per_level {
            *decay = non_negative(*decay);
        }
        let points = &mut self.siege.points;
        points.per_member = non_negative(points.per_member);
        points.max_per_second = non_negative(points.max_per_second);

        let siege = &mut self.siege;
        siege.preparation_minutes = siege.preparation_minutes.max(0);
        siege.in_progress_remind_interval = siege.in_progress_remind_interval.max(0);
        siege.short_remind_start = siege.short_remind_start.max(0);
        siege.short_remind_interval = siege.short_remind_interval.max(0);
        siege.long_remind_interval = siege.long_remind_interval.max(0);
        self
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}
