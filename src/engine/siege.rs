//! Declared warfare over a territory.
//!
//! A declaration opens a preparation window. Once it has elapsed, every second
//! tick weighs the attackers standing inside the territory against its
//! defenders and moves the siege progress towards +1.0 (taken) or -1.0
//! (repelled). Reminders go out on whole-minute boundaries while the siege is
//! pending and while it runs.

use std::collections::BTreeMap;

use bevy_ecs::resource::Resource;

use super::claim::PROGRESS_CEILING;
use super::config::SiegeConfig;
use super::directory::{Directory, Faction, Territory};
use crate::model::timestamp::SECONDS_PER_MINUTE;
use crate::model::{
    DeclarationRecord, FactionId, PlayerPresence, RejectReason, ReminderPhase, SiegeEvent,
    SiegeSnapshot, SiegeState, TerritoryId, WallTime,
};

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SiegeEngine {
    owners: BTreeMap<TerritoryId, FactionId>,
    sieges: BTreeMap<TerritoryId, SiegeState>,
}

/// Which reminder cadence (if any) fires with `remaining_minutes` left.
///
/// An interval of zero switches that cadence off.
pub fn reminder_due(remaining_minutes: i64, config: &SiegeConfig) -> Option<ReminderPhase> {
    let (interval, minutes, phase) = if remaining_minutes <= 0 {
        (
            config.in_progress_remind_interval,
            -remaining_minutes,
            ReminderPhase::InProgress,
        )
    } else if remaining_minutes <= config.short_remind_start {
        (
            config.short_remind_interval,
            remaining_minutes,
            ReminderPhase::Approaching,
        )
    } else {
        (
            config.long_remind_interval,
            remaining_minutes,
            ReminderPhase::Distant,
        )
    };
    (interval > 0 && minutes % interval == 0).then_some(phase)
}

impl SiegeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Persistence --

    /// Rebuild from a persisted snapshot, discarding broken declarations.
    pub fn from_snapshot(snapshot: SiegeSnapshot) -> Self {
        let SiegeSnapshot {
            owners,
            declarations,
            mut progress,
        } = snapshot;

        let mut sieges = BTreeMap::new();
        for (territory_id, record) in declarations {
            let stored = progress.remove(&territory_id);
            let DeclarationRecord {
                attacker,
                declared_at,
            } = record;
            let Some(attacker_id) = attacker else {
                tracing::error!(territory_id, "siege declaration without attacker, dropping");
                continue;
            };
            let Some(declared_at) = declared_at else {
                tracing::error!(
                    territory_id,
                    faction_id = attacker_id,
                    "siege declaration without date, dropping"
                );
                continue;
            };
            if owners.get(&territory_id) == Some(&attacker_id) {
                tracing::error!(
                    territory_id,
                    faction_id = attacker_id,
                    "besieged territory already owned by the attacker, dropping"
                );
                continue;
            }

            let mut state = SiegeState::new(attacker_id, declared_at);
            match stored {
                Some(value) if value.is_finite() => {
                    state.progress = value.clamp(-PROGRESS_CEILING, PROGRESS_CEILING);
                    if state.progress != value {
                        tracing::error!(
                            territory_id,
                            progress = value,
                            clamped = state.progress,
                            "siege progress out of range, clamping"
                        );
                    }
                }
                Some(value) => tracing::error!(
                    territory_id,
                    progress = value,
                    "siege progress is not a number, resetting"
                ),
                None => {}
            }
            sieges.insert(territory_id, state);
        }

        for territory_id in progress.keys() {
            tracing::error!(territory_id, "siege progress without a declaration, dropping");
        }

        Self { owners, sieges }
    }

    pub fn to_snapshot(&self) -> SiegeSnapshot {
        SiegeSnapshot {
            owners: self.owners.clone(),
            declarations: self
                .sieges
                .iter()
                .map(|(&territory_id, siege)| {
                    (
                        territory_id,
                        DeclarationRecord::new(siege.attacker_id, siege.declared_at),
                    )
                })
                .collect(),
            progress: self
                .sieges
                .iter()
                .map(|(&territory_id, siege)| (territory_id, siege.progress))
                .collect(),
        }
    }

    // -- Declaration --

    pub fn declaration_check(
        &self,
        attacker_id: FactionId,
        territory_id: TerritoryId,
    ) -> Result<(), RejectReason> {
        if self.owner(territory_id) == Some(attacker_id) {
            return Err(RejectReason::AlreadyOwned);
        }
        if self.is_besieged(territory_id) {
            return Err(RejectReason::AlreadyBesieged);
        }
        Ok(())
    }

    /// Record the attacker and the declaration instant together. Refuses a
    /// second siege on the same territory and a siege on one's own territory.
    pub fn declare(
        &mut self,
        attacker_id: FactionId,
        territory_id: TerritoryId,
        now: WallTime,
    ) -> bool {
        if self.declaration_check(attacker_id, territory_id).is_err() {
            return false;
        }
        self.sieges
            .insert(territory_id, SiegeState::new(attacker_id, now));
        tracing::info!(territory_id, faction_id = attacker_id, "siege declared");
        true
    }

    /// Preparation minutes left; zero or negative once the contest runs.
    /// A declaration in the future (clock went backwards) counts as just made.
    pub fn remaining_minutes(
        &self,
        territory_id: TerritoryId,
        now: WallTime,
        config: &SiegeConfig,
    ) -> Option<i64> {
        let siege = self.sieges.get(&territory_id)?;
        let elapsed = now.minutes_since(siege.declared_at).max(0);
        Some(config.preparation_minutes - elapsed)
    }

    pub fn siege_started(
        &self,
        territory_id: TerritoryId,
        now: WallTime,
        config: &SiegeConfig,
    ) -> bool {
        self.remaining_minutes(territory_id, now, config)
            .is_some_and(|remaining| remaining <= 0)
    }

    // -- Ticking --

    pub fn needs_tick(&self) -> bool {
        !self.sieges.is_empty()
    }

    /// One second of siege time: reminders on minute boundaries, then the
    /// point contest for every siege past its preparation window.
    pub fn second_tick(
        &mut self,
        now: WallTime,
        directory: &dyn Directory,
        config: &SiegeConfig,
    ) -> Vec<SiegeEvent> {
        let declared: Vec<TerritoryId> = self.sieges.keys().copied().collect();
        let mut events = Vec::new();

        for territory_id in declared {
            let owner = self.owner(territory_id);
            let Some(siege) = self.sieges.get_mut(&territory_id) else {
                continue;
            };
            if now.millis_since(siege.declared_at) < 0 {
                continue;
            }
            let passed_minutes = now.minutes_since(siege.declared_at);
            let passed_seconds = now.seconds_since(siege.declared_at);

            let on_boundary = match siege.last_reminder_minute {
                Some(last) => passed_minutes > last,
                None => passed_seconds == passed_minutes * SECONDS_PER_MINUTE,
            };
            siege.last_reminder_minute = Some(passed_minutes);
            if on_boundary {
                let remaining_minutes = config.preparation_minutes - passed_minutes;
                if let Some(phase) = reminder_due(remaining_minutes, config) {
                    events.push(SiegeEvent::Reminder {
                        territory_id,
                        attacker_id: siege.attacker_id,
                        defender_id: owner,
                        remaining_minutes,
                        phase,
                    });
                }
            }

            if passed_minutes < config.preparation_minutes {
                continue;
            }
            if let Some(event) = self.contest_tick(territory_id, directory, config) {
                events.push(event);
            }
        }

        events
    }

    fn contest_tick(
        &mut self,
        territory_id: TerritoryId,
        directory: &dyn Directory,
        config: &SiegeConfig,
    ) -> Option<SiegeEvent> {
        let attacker_id = self.attacker(territory_id)?;
        let defender_id = self.owner(territory_id);
        let Some(territory) = directory.territory(territory_id) else {
            if self.first_unresolved(territory_id) {
                tracing::error!(territory_id, "failed to resolve besieged territory");
            }
            return None;
        };

        let attackers =
            self.present_members(attacker_id, territory_id, territory.as_ref(), directory);
        let defenders = defender_id
            .map(|defender| {
                self.present_members(defender, territory_id, territory.as_ref(), directory)
            })
            .unwrap_or(0);

        let difference = i64::try_from(attackers).unwrap_or(i64::MAX)
            - i64::try_from(defenders).unwrap_or(i64::MAX);
        let points = config.points_per_second(difference);

        let siege = self.sieges.get_mut(&territory_id)?;
        siege.attacker_count = attackers;
        siege.defender_count = defenders;
        siege.progress += points;
        let progress = siege.progress;
        tracing::debug!(territory_id, attackers, defenders, progress, "siege tick");

        if progress >= 1.0 {
            self.sieges.remove(&territory_id);
            self.owners.insert(territory_id, attacker_id);
            tracing::info!(territory_id, faction_id = attacker_id, ?defender_id, "siege succeeded");
            Some(SiegeEvent::Succeeded {
                territory_id,
                attacker_id,
                defender_id,
            })
        } else if progress <= -1.0 {
            self.sieges.remove(&territory_id);
            tracing::info!(territory_id, faction_id = attacker_id, ?defender_id, "siege failed");
            Some(SiegeEvent::Failed {
                territory_id,
                attacker_id,
                defender_id,
            })
        } else {
            None
        }
    }

    /// Online members of `faction` standing inside `territory`, border excluded.
    pub fn sieging_members(faction: &dyn Faction, territory: &dyn Territory) -> Vec<PlayerPresence> {
        let territory_id = territory.id();
        faction
            .online_members()
            .into_iter()
            .filter(|player| player.is_in(territory_id))
            .filter(|player| !territory.is_border_position(player))
            .collect()
    }

    /// Count of sieging members; an unresolvable faction counts as nobody.
    fn present_members(
        &mut self,
        faction_id: FactionId,
        territory_id: TerritoryId,
        territory: &dyn Territory,
        directory: &dyn Directory,
    ) -> usize {
        match directory.faction(faction_id) {
            Some(faction) => Self::sieging_members(faction.as_ref(), territory).len(),
            None => {
                if self.first_unresolved(territory_id) {
                    tracing::error!(territory_id, faction_id, "failed to resolve sieging faction");
                }
                0
            }
        }
    }

    /// True only the first time a siege runs into an unresolvable reference.
    fn first_unresolved(&mut self, territory_id: TerritoryId) -> bool {
        self.sieges
            .get_mut(&territory_id)
            .is_some_and(|siege| !std::mem::replace(&mut siege.unresolved_reported, true))
    }

    // -- Ownership --

    /// Record an owner decided elsewhere (a claim). A siege by the new owner
    /// has nothing left to take and is dropped.
    pub fn set_owner(&mut self, territory_id: TerritoryId, faction_id: FactionId) {
        self.owners.insert(territory_id, faction_id);
        if self.attacker(territory_id) == Some(faction_id) {
            self.sieges.remove(&territory_id);
            tracing::warn!(
                territory_id,
                faction_id,
                "siege dropped, attacker already owns the territory"
            );
        }
    }

    pub fn remove_faction(&mut self, faction_id: FactionId) {
        self.owners.retain(|_, owner| *owner != faction_id);
        self.sieges
            .retain(|_, siege| siege.attacker_id != faction_id);
    }

    pub fn remove_territory(&mut self, territory_id: TerritoryId) {
        self.owners.remove(&territory_id);
        self.sieges.remove(&territory_id);
    }

    // -- Queries --

    pub fn owner(&self, territory_id: TerritoryId) -> Option<FactionId> {
        self.owners.get(&territory_id).copied()
    }

    pub fn attacker(&self, territory_id: TerritoryId) -> Option<FactionId> {
        self.sieges
            .get(&territory_id)
            .map(|siege| siege.attacker_id)
    }

    pub fn declaration(&self, territory_id: TerritoryId) -> Option<&SiegeState> {
        self.sieges.get(&territory_id)
    }

    pub fn is_besieged(&self, territory_id: TerritoryId) -> bool {
        self.sieges.contains_key(&territory_id)
    }

    pub fn siege_progress(&self, territory_id: TerritoryId) -> f64 {
        self.sieges
            .get(&territory_id)
            .map_or(0.0, |siege| siege.progress)
    }

    pub fn attacker_count(&self, territory_id: TerritoryId) -> usize {
        self.sieges
            .get(&territory_id)
            .map_or(0, |siege| siege.attacker_count)
    }

    pub fn defender_count(&self, territory_id: TerritoryId) -> usize {
        self.sieges
            .get(&territory_id)
            .map_or(0, |siege| siege.defender_count)
    }

    /// Territories `faction_id` has declared sieges on.
    pub fn attacking_territories(&self, faction_id: FactionId) -> Vec<TerritoryId> {
        self.sieges
            .iter()
            .filter(|(_, siege)| siege.attacker_id == faction_id)
            .map(|(&territory_id, _)| territory_id)
            .collect()
    }

    /// Territories owned by `faction_id` that have a siege declared on them.
    pub fn defending_territories(&self, faction_id: FactionId) -> Vec<TerritoryId> {
        self.owned_territories(faction_id)
            .into_iter()
            .filter(|territory_id| self.sieges.contains_key(territory_id))
            .collect()
    }

    pub fn owned_territories(&self, faction_id: FactionId) -> Vec<TerritoryId> {
        self.owners
            .iter()
            .filter(|(_, owner)| **owner == faction_id)
            .map(|(&territory_id, _)| territory_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::PointsCurve;
    use crate::testutil::InMemoryDirectory;

    const ATTACKER: FactionId = 10;
    const DEFENDER: FactionId = 20;
    const CASTLE: TerritoryId = 1;

    fn config() -> SiegeConfig {
        SiegeConfig {
            preparation_minutes: 15,
            in_progress_remind_interval: 5,
            short_remind_start: 10,
            short_remind_interval: 5,
            long_remind_interval: 60,
            points: PointsCurve {
                per_member: 0.05,
                max_per_second: 0.2,
            },
        }
    }

    fn directory(attackers: usize, defenders: usize) -> InMemoryDirectory {
        let directory = InMemoryDirectory::new();
        directory.add_territory(CASTLE, 1);
        let attacking = directory.add_faction(ATTACKER, 8);
        let defending = directory.add_faction(DEFENDER, 8);
        for i in 0..attackers {
            attacking.join_online(PlayerPresence::new(format!("a{i}")).standing_in(CASTLE));
        }
        for i in 0..defenders {
            defending.join_online(PlayerPresence::new(format!("d{i}")).standing_in(CASTLE));
        }
        directory
    }

    fn declared_engine(with_owner: bool) -> SiegeEngine {
        let mut engine = SiegeEngine::new();
        if with_owner {
            engine.set_owner(CASTLE, DEFENDER);
        }
        assert!(engine.declare(ATTACKER, CASTLE, WallTime::from_millis(0)));
        engine
    }

    #[test]
    fn reminder_regimes() {
        let config = config();
        assert_eq!(reminder_due(60, &config), Some(ReminderPhase::Distant));
        assert_eq!(reminder_due(45, &config), None);
        assert_eq!(reminder_due(10, &config), Some(ReminderPhase::Approaching));
        assert_eq!(reminder_due(8, &config), None);
        assert_eq!(reminder_due(5, &config), Some(ReminderPhase::Approaching));
        assert_eq!(reminder_due(0, &config), Some(ReminderPhase::InProgress));
        assert_eq!(reminder_due(-3, &config), None);
        assert_eq!(reminder_due(-10, &config), Some(ReminderPhase::InProgress));
    }

    #[test]
    fn zero_interval_disables_reminders() {
        let config = SiegeConfig {
            long_remind_interval: 0,
            ..config()
        };
        assert_eq!(reminder_due(60, &config), None);
    }

    #[test]
    fn remaining_minutes_counts_down() {
        let config = config();
        let engine = declared_engine(true);
        let at = |minutes, seconds| WallTime::from_minutes(minutes).plus_seconds(seconds);
        assert_eq!(engine.remaining_minutes(CASTLE, at(0, 0), &config), Some(15));
        assert_eq!(engine.remaining_minutes(CASTLE, at(4, 59), &config), Some(11));
        assert_eq!(engine.remaining_minutes(CASTLE, at(15, 0), &config), Some(0));
        assert_eq!(engine.remaining_minutes(CASTLE, at(20, 0), &config), Some(-5));
        assert_eq!(engine.remaining_minutes(2, at(0, 0), &config), None);
        assert!(!engine.siege_started(CASTLE, at(14, 59), &config));
        assert!(engine.siege_started(CASTLE, at(15, 0), &config));
    }

    #[test]
    fn backwards_clock_reads_as_not_started() {
        let config = config();
        let mut engine = SiegeEngine::new();
        engine.declare(ATTACKER, CASTLE, WallTime::from_minutes(30));
        let earlier = WallTime::from_minutes(10);
        assert_eq!(engine.remaining_minutes(CASTLE, earlier, &config), Some(15));

        let directory = directory(5, 0);
        assert!(engine.second_tick(earlier, &directory, &config).is_empty());
        assert_eq!(engine.siege_progress(CASTLE), 0.0);
    }

    #[test]
    fn reminders_fire_once_per_minute_boundary() {
        let config = config();
        let directory = directory(0, 0);
        let mut engine = declared_engine(true);

        let mut fired = Vec::new();
        for second in 0..=(12 * 60) {
            let now = WallTime::from_seconds(second);
            for event in engine.second_tick(now, &directory, &config) {
                if let SiegeEvent::Reminder {
                    remaining_minutes,
                    defender_id,
                    ..
                } = event
                {
                    assert_eq!(defender_id, Some(DEFENDER));
                    fired.push((second / 60, remaining_minutes));
                }
            }
        }
        assert_eq!(fired, vec![(5, 10), (10, 5)]);
    }

    #[test]
    fn reminders_tolerate_jittered_ticks() {
        let config = config();
        let directory = directory(0, 0);
        let mut engine = declared_engine(false);

        // Ticks land 700ms past each second; a boundary is still seen once.
        let mut fired = Vec::new();
        for second in 0..(11 * 60) {
            let now = WallTime::from_millis(second * 1_000 + 700);
            for event in engine.second_tick(now, &directory, &config) {
                if let SiegeEvent::Reminder { remaining_minutes, .. } = event {
                    fired.push(remaining_minutes);
                }
            }
        }
        assert_eq!(fired, vec![10, 5]);
    }

    #[test]
    fn contest_waits_for_preparation() {
        let config = config();
        let directory = directory(5, 0);
        let mut engine = declared_engine(true);
        engine.second_tick(WallTime::from_minutes(14).plus_seconds(59), &directory, &config);
        assert_eq!(engine.siege_progress(CASTLE), 0.0);
        assert_eq!(engine.attacker_count(CASTLE), 0);
    }

    #[test]
    fn attackers_take_the_territory_in_five_ticks() {
        let config = config();
        let directory = directory(5, 0);
        let mut engine = declared_engine(true);
        let start = WallTime::from_minutes(15).plus_seconds(1);

        for tick in 0..4 {
            let events = engine.second_tick(start.plus_seconds(tick), &directory, &config);
            assert!(events.is_empty());
            assert_eq!(engine.attacker_count(CASTLE), 5);
            assert_eq!(engine.defender_count(CASTLE), 0);
        }
        let events = engine.second_tick(start.plus_seconds(4), &directory, &config);
        assert_eq!(
            events,
            vec![SiegeEvent::Succeeded {
                territory_id: CASTLE,
                attacker_id: ATTACKER,
                defender_id: Some(DEFENDER),
            }]
        );
        assert_eq!(engine.owner(CASTLE), Some(ATTACKER));
        assert_eq!(engine.attacker(CASTLE), None);
        assert_eq!(engine.siege_progress(CASTLE), 0.0);
        assert!(!engine.needs_tick());
    }

    #[test]
    fn defenders_repel_the_siege_in_five_ticks() {
        let config = config();
        let directory = directory(0, 5);
        let mut engine = declared_engine(true);
        let start = WallTime::from_minutes(15).plus_seconds(1);

        let mut last = Vec::new();
        for tick in 0..5 {
            last = engine.second_tick(start.plus_seconds(tick), &directory, &config);
        }
        assert_eq!(
            last,
            vec![SiegeEvent::Failed {
                territory_id: CASTLE,
                attacker_id: ATTACKER,
                defender_id: Some(DEFENDER),
            }]
        );
        assert_eq!(engine.owner(CASTLE), Some(DEFENDER));
        assert!(!engine.is_besieged(CASTLE));
    }

    #[test]
    fn border_and_outside_players_do_not_count() {
        let config = config();
        let directory = directory(2, 0);
        let attacking = directory.faction_record(ATTACKER).unwrap();
        attacking.join_online(PlayerPresence::new("edge").standing_in(CASTLE));
        attacking.join_online(PlayerPresence::new("away").standing_in(99));
        attacking.join_online(PlayerPresence::new("nowhere"));
        directory
            .territory_record(CASTLE)
            .unwrap()
            .set_border(["edge"]);

        let mut engine = declared_engine(false);
        engine.second_tick(WallTime::from_minutes(15), &directory, &config);
        assert_eq!(engine.attacker_count(CASTLE), 2);
        assert_eq!(engine.defender_count(CASTLE), 0);
        assert!((engine.siege_progress(CASTLE) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn missing_territory_skips_contest() {
        let config = config();
        let directory = directory(5, 0);
        let mut engine = SiegeEngine::new();
        engine.declare(ATTACKER, 42, WallTime::from_millis(0));
        engine.second_tick(WallTime::from_minutes(20), &directory, &config);
        assert!(engine.is_besieged(42));
        assert_eq!(engine.siege_progress(42), 0.0);
        assert!(engine.declaration(42).unwrap().unresolved_reported);
    }

    #[test]
    fn vanished_defender_counts_as_nobody_and_is_reported_once() {
        let config = config();
        let directory = directory(1, 5);
        directory.remove_faction(DEFENDER);
        let mut engine = declared_engine(true);
        let start = WallTime::from_minutes(15);

        assert!(!engine.declaration(CASTLE).unwrap().unresolved_reported);
        engine.second_tick(start, &directory, &config);
        assert_eq!(engine.attacker_count(CASTLE), 1);
        assert_eq!(engine.defender_count(CASTLE), 0);
        assert!(engine.declaration(CASTLE).unwrap().unresolved_reported);
        assert!(!engine.first_unresolved(CASTLE));

        engine.second_tick(start.plus_seconds(1), &directory, &config);
        assert!((engine.siege_progress(CASTLE) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn declaration_rules() {
        let mut engine = SiegeEngine::new();
        engine.set_owner(CASTLE, DEFENDER);
        assert_eq!(
            engine.declaration_check(DEFENDER, CASTLE),
            Err(RejectReason::AlreadyOwned)
        );
        assert!(!engine.declare(DEFENDER, CASTLE, WallTime::from_millis(0)));
        assert!(engine.declare(ATTACKER, CASTLE, WallTime::from_millis(0)));
        assert!(!engine.declare(30, CASTLE, WallTime::from_millis(5)));
        assert_eq!(engine.attacker(CASTLE), Some(ATTACKER));
        assert_eq!(
            engine.declaration(CASTLE).unwrap().declared_at,
            WallTime::from_millis(0)
        );
    }

    #[test]
    fn reverse_lookups() {
        let mut engine = SiegeEngine::new();
        engine.set_owner(1, DEFENDER);
        engine.set_owner(2, DEFENDER);
        engine.set_owner(3, DEFENDER);
        engine.declare(ATTACKER, 1, WallTime::from_millis(0));
        engine.declare(ATTACKER, 3, WallTime::from_millis(0));
        engine.declare(30, 4, WallTime::from_millis(0));

        assert_eq!(engine.attacking_territories(ATTACKER), vec![1, 3]);
        assert_eq!(engine.defending_territories(DEFENDER), vec![1, 3]);
        assert_eq!(engine.owned_territories(DEFENDER), vec![1, 2, 3]);
        assert!(engine.defending_territories(ATTACKER).is_empty());
    }

    #[test]
    fn remove_faction_purges_every_reference() {
        let mut engine = SiegeEngine::new();
        engine.set_owner(1, ATTACKER);
        engine.set_owner(2, DEFENDER);
        engine.declare(ATTACKER, 2, WallTime::from_millis(0));
        engine.declare(DEFENDER, 1, WallTime::from_millis(0));

        engine.remove_faction(ATTACKER);
        assert_eq!(engine.owner(1), None);
        assert_eq!(engine.attacker(2), None);
        assert!(engine.attacking_territories(ATTACKER).is_empty());
        assert!(engine.defending_territories(ATTACKER).is_empty());
        assert!(engine.defending_territories(DEFENDER).is_empty());
        assert_eq!(engine.attacker(1), Some(DEFENDER));
    }

    #[test]
    fn set_owner_drops_siege_by_new_owner() {
        let mut engine = declared_engine(true);
        engine.set_owner(CASTLE, ATTACKER);
        assert!(!engine.is_besieged(CASTLE));
        assert_eq!(engine.owner(CASTLE), Some(ATTACKER));
    }

    #[test]
    fn snapshot_round_trip() {
        let mut engine = declared_engine(true);
        engine.sieges.get_mut(&CASTLE).unwrap().progress = -0.3;
        let restored = SiegeEngine::from_snapshot(engine.to_snapshot());
        assert_eq!(restored.owner(CASTLE), Some(DEFENDER));
        assert_eq!(restored.attacker(CASTLE), Some(ATTACKER));
        assert_eq!(restored.siege_progress(CASTLE), -0.3);
    }

    #[test]
    fn snapshot_repair_drops_broken_declarations() {
        let mut snapshot = SiegeSnapshot::default();
        snapshot.owners.insert(1, ATTACKER);
        snapshot
            .declarations
            .insert(1, DeclarationRecord::new(ATTACKER, WallTime::from_millis(0)));
        snapshot.declarations.insert(
            2,
            DeclarationRecord {
                attacker: Some(ATTACKER),
                declared_at: None,
            },
        );
        snapshot.declarations.insert(
            3,
            DeclarationRecord {
                attacker: None,
                declared_at: Some(WallTime::from_millis(0)),
            },
        );
        snapshot
            .declarations
            .insert(4, DeclarationRecord::new(DEFENDER, WallTime::from_millis(7)));
        snapshot.progress.insert(4, f64::INFINITY);
        snapshot.progress.insert(5, 0.5);

        let engine = SiegeEngine::from_snapshot(snapshot);
        assert_eq!(engine.owner(1), Some(ATTACKER));
        assert!(!engine.is_besieged(1));
        assert!(!engine.is_besieged(2));
        assert!(!engine.is_besieged(3));
        assert_eq!(engine.attacker(4), Some(DEFENDER));
        assert_eq!(engine.siege_progress(4), 0.0);
        assert!(!engine.is_besieged(5));
    }
}
