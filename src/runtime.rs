//! The contest runtime: sole owner of the contest app.
//!
//! Everything that touches the engines goes through this value on one thread.
//! Other threads reach it only through a cloned [`ActionInbox`], whose actions
//! are drained at the start of the next tick. Dropping the runtime drops the
//! schedule, which ends every tick subscription at once; `unload` saves first.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bevy_app::App;
use bevy_ecs::change_detection::Mut;
use serde::de::DeserializeOwned;
use sqlx::PgPool;

use crate::db::{self, CLAIMS_ENGINE, SIEGES_ENGINE};
use crate::ecs::systems::notices::deliver_notice;
use crate::ecs::systems::ownership::apply_ownership_change;
use crate::ecs::{
    ActionEffects, ActionInbox, ActionResults, ContestClock, ContestSettings, ContestTick,
    Directories, apply_action, build_contest_app, claim_initiation_check,
    siege_declaration_check,
};
use crate::engine::{ClaimEngine, ContestConfig, Directory, SiegeEngine};
use crate::flush::{load_or_init, save_logged};
use crate::model::{
    ActionOutcome, ActionResult, ClaimSnapshot, ContestAction, FactionId, PlayerPresence,
    SiegeSnapshot, TerritoryId, WallTime,
};

/// Where each engine's snapshot lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub claims: PathBuf,
    pub sieges: PathBuf,
}

impl SnapshotPaths {
    /// `claims.json` and `sieges.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            claims: dir.join("claims.json"),
            sieges: dir.join("sieges.json"),
        }
    }
}

pub struct ContestRuntime {
    app: App,
    paths: SnapshotPaths,
    inbox: ActionInbox,
}

impl ContestRuntime {
    pub fn new(
        config: ContestConfig,
        directory: Arc<dyn Directory>,
        claims: ClaimEngine,
        sieges: SiegeEngine,
        paths: SnapshotPaths,
        now: WallTime,
    ) -> Self {
        let app = build_contest_app(config, directory, claims, sieges, now);
        let inbox = app.world().resource::<ActionInbox>().clone();
        Self { app, paths, inbox }
    }

    /// Load both engines from their snapshot files. A missing file starts
    /// that engine empty and writes its first snapshot; an unreadable one is
    /// logged and also starts empty.
    pub fn load(
        config: ContestConfig,
        directory: Arc<dyn Directory>,
        paths: SnapshotPaths,
        now: WallTime,
    ) -> Self {
        let claims: ClaimSnapshot = load_or_init(&paths.claims, "claim snapshot");
        let sieges: SiegeSnapshot = load_or_init(&paths.sieges, "siege snapshot");
        Self::new(
            config,
            directory,
            ClaimEngine::from_snapshot(claims),
            SiegeEngine::from_snapshot(sieges),
            paths,
            now,
        )
    }

    /// Load both engines from Postgres. An engine without a stored row, or
    /// whose row cannot be read, starts empty; the failure is logged and never
    /// returned. `paths` is still used by `save` and `unload`.
    pub async fn load_from_db(
        config: ContestConfig,
        directory: Arc<dyn Directory>,
        pool: &PgPool,
        paths: SnapshotPaths,
        now: WallTime,
    ) -> Self {
        let claims: ClaimSnapshot = load_row_or_default(pool, CLAIMS_ENGINE).await;
        let sieges: SiegeSnapshot = load_row_or_default(pool, SIEGES_ENGINE).await;
        Self::new(
            config,
            directory,
            ClaimEngine::from_snapshot(claims),
            SiegeEngine::from_snapshot(sieges),
            paths,
            now,
        )
    }

    // -- Ticking --

    /// One live second tick at the current system time.
    pub fn tick(&mut self) {
        self.tick_at(WallTime::now());
    }

    /// One second tick with the clock set to `now` first.
    pub fn tick_at(&mut self, now: WallTime) {
        self.app
            .world_mut()
            .resource_mut::<ContestClock>()
            .sync_to(now);
        self.app.world_mut().run_schedule(ContestTick);
    }

    /// `ticks` simulated second ticks, each one second after the last.
    pub fn run_for(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.app.world_mut().run_schedule(ContestTick);
        }
    }

    pub fn now(&self) -> WallTime {
        self.app.world().resource::<ContestClock>().time
    }

    // -- Actions --

    /// A handle for submitting actions from other threads.
    pub fn inbox(&self) -> ActionInbox {
        self.inbox.clone()
    }

    /// Queue an action for the next tick.
    pub fn submit(&self, action: ContestAction) {
        self.inbox.submit(action);
    }

    /// Apply an action right away, on the owning thread. Ownership sync and
    /// notices happen before this returns.
    pub fn apply(&mut self, action: ContestAction) -> ActionOutcome {
        let world = self.app.world_mut();
        let now = world.resource::<ContestClock>().time;
        let config = world.resource::<ContestSettings>().0.clone();
        let directory = Arc::clone(&world.resource::<Directories>().0);

        let mut effects = ActionEffects::default();
        let outcome = world.resource_scope(|world, mut claims: Mut<ClaimEngine>| {
            let mut sieges = world.resource_mut::<SiegeEngine>();
            let outcome = apply_action(
                &action,
                &mut claims,
                &mut sieges,
                &config,
                directory.as_ref(),
                now,
                &mut effects,
            );
            for change in &effects.ownership {
                apply_ownership_change(change, &mut claims, &mut sieges);
            }
            outcome
        });
        for notice in &effects.notices {
            deliver_notice(notice, directory.as_ref());
        }
        outcome
    }

    /// Results of the queued actions processed by the latest tick, oldest
    /// first. The next tick discards whatever was not taken.
    pub fn take_results(&mut self) -> Vec<ActionResult> {
        std::mem::take(
            &mut self
                .app
                .world_mut()
                .resource_mut::<ActionResults>()
                .0,
        )
    }

    // -- Queries --

    pub fn claims(&self) -> &ClaimEngine {
        self.app.world().resource::<ClaimEngine>()
    }

    pub fn sieges(&self) -> &SiegeEngine {
        self.app.world().resource::<SiegeEngine>()
    }

    pub fn config(&self) -> &ContestConfig {
        &self.app.world().resource::<ContestSettings>().0
    }

    fn directory(&self) -> &dyn Directory {
        self.app.world().resource::<Directories>().0.as_ref()
    }

    /// Whether the present players could start a claim here. Also refuses
    /// while another faction besieges the territory.
    pub fn can_initiate_claim(&self, territory_id: TerritoryId, players: &[PlayerPresence]) -> bool {
        let directory = self.directory();
        let Some(territory) = directory.territory(territory_id) else {
            return false;
        };
        claim_initiation_check(
            self.claims(),
            self.sieges(),
            territory.as_ref(),
            players,
            directory,
            &self.config().claim,
        )
        .is_ok()
    }

    pub fn can_progress_claim(&self, territory_id: TerritoryId, players: &[PlayerPresence]) -> bool {
        self.claims().can_progress(territory_id, players)
    }

    /// Whether `attacker_id` may declare a siege on the territory right now.
    pub fn can_declare(&self, attacker_id: FactionId, territory_id: TerritoryId) -> bool {
        siege_declaration_check(self.claims(), self.sieges(), attacker_id, territory_id).is_ok()
    }

    /// Preparation minutes left at the clock's current time.
    pub fn remaining_minutes(&self, territory_id: TerritoryId) -> Option<i64> {
        self.sieges()
            .remaining_minutes(territory_id, self.now(), &self.config().siege)
    }

    pub fn siege_started(&self, territory_id: TerritoryId) -> bool {
        self.sieges()
            .siege_started(territory_id, self.now(), &self.config().siege)
    }

    // -- Persistence --

    /// Write both snapshot files. Failures are logged and not retried.
    pub fn save(&self) -> bool {
        let claims = save_logged(
            &self.paths.claims,
            &self.claims().to_snapshot(),
            "claim snapshot",
        );
        let sieges = save_logged(
            &self.paths.sieges,
            &self.sieges().to_snapshot(),
            "siege snapshot",
        );
        claims && sieges
    }

    /// Store both snapshots in Postgres. Failures are logged; `false` if
    /// either engine was not stored.
    pub async fn save_to_db(&self, pool: &PgPool) -> bool {
        let claims = self.claims().to_snapshot();
        let sieges = self.sieges().to_snapshot();
        let mut saved = true;
        for (engine, result) in [
            (CLAIMS_ENGINE, db::save_snapshot(pool, CLAIMS_ENGINE, &claims).await),
            (SIEGES_ENGINE, db::save_snapshot(pool, SIEGES_ENGINE, &sieges).await),
        ] {
            if let Err(err) = result {
                tracing::error!(engine, error = %err, "failed to save snapshot to postgres");
                saved = false;
            }
        }
        if saved {
            tracing::info!("saved contest snapshots to postgres");
        }
        saved
    }

    /// Save and shut down. Queued actions that were never ticked are dropped.
    pub fn unload(self) -> bool {
        let dropped = self.inbox.len();
        if dropped > 0 {
            tracing::warn!(dropped, "unloading with queued actions");
        }
        let saved = self.save();
        tracing::info!(saved, "contest runtime unloaded");
        saved
    }
}

async fn load_row_or_default<T>(pool: &PgPool, engine: &str) -> T
where
    T: DeserializeOwned + Default + Send + Unpin + 'static,
{
    match db::load_snapshot(pool, engine).await {
        Ok(Some(snapshot)) => {
            tracing::info!(engine, "loaded snapshot from postgres");
            snapshot
        }
        Ok(None) => {
            tracing::info!(engine, "no stored snapshot, starting empty");
            T::default()
        }
        Err(err) => {
            tracing::error!(engine, error = %err, "failed to load snapshot from postgres, starting empty");
            T::default()
        }
    }
}
