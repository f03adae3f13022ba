//! Action processing.
//!
//! Actions arrive through the `ActionInbox` from the event layer and are
//! drained in `ContestPhase::PreUpdate`, so they never interleave with the
//! engine ticks. `apply_action` is the single code path for every action; the
//! runtime calls it directly when it applies an action on the owning thread.

use bevy_app::{App, Plugin};
use bevy_ecs::message::{MessageWriter, message_update_system};
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Res, ResMut};

use super::claims::capture_messages;
use crate::ecs::clock::ContestClock;
use crate::ecs::messages::{NoticeMessage, OwnershipChanged};
use crate::ecs::resources::{ActionInbox, ActionResults, ContestSettings, Directories};
use crate::ecs::schedule::{ContestPhase, ContestTick};
use crate::engine::{ClaimConfig, ClaimEngine, ContestConfig, Directory, SiegeEngine, Territory};
use crate::model::{
    ActionOutcome, ActionResult, ClaimProgress, ContestAction, FactionId, PlayerPresence,
    RejectReason, TerritoryId, WallTime,
};

// ---------------------------------------------------------------------------
// System registration
// ---------------------------------------------------------------------------

pub struct ActionsPlugin;

impl Plugin for ActionsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActionResults>();
        app.add_systems(
            ContestTick,
            (clear_action_results, process_actions)
                .chain()
                .after(message_update_system)
                .in_set(ContestPhase::PreUpdate),
        );
    }
}

/// Follow-up work an applied action leaves for the rest of the tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionEffects {
    pub notices: Vec<NoticeMessage>,
    pub ownership: Vec<OwnershipChanged>,
}

// ---------------------------------------------------------------------------
// Cross-engine checks
// ---------------------------------------------------------------------------

/// Claim initiation as the claim engine sees it, plus the siege side: a claim
/// cannot start while another faction besieges the territory.
pub fn claim_initiation_check(
    claims: &ClaimEngine,
    sieges: &SiegeEngine,
    territory: &dyn Territory,
    players: &[PlayerPresence],
    directory: &dyn Directory,
    config: &ClaimConfig,
) -> Result<FactionId, RejectReason> {
    let initiator = claims.initiation_check(territory, players, directory, config)?;
    if sieges
        .attacker(territory.id())
        .is_some_and(|attacker| attacker != initiator)
    {
        return Err(RejectReason::SiegeInProgress);
    }
    Ok(initiator)
}

/// Siege declaration as the siege engine sees it, plus the claim side: no
/// siege on a territory another faction is claiming.
pub fn siege_declaration_check(
    claims: &ClaimEngine,
    sieges: &SiegeEngine,
    attacker_id: FactionId,
    territory_id: TerritoryId,
) -> Result<(), RejectReason> {
    if claims.owner(territory_id) == Some(attacker_id) {
        return Err(RejectReason::AlreadyOwned);
    }
    sieges.declaration_check(attacker_id, territory_id)?;
    if claims
        .contester(territory_id)
        .is_some_and(|contester| contester != attacker_id)
    {
        return Err(RejectReason::ClaimInProgress);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Main dispatch
// ---------------------------------------------------------------------------

fn clear_action_results(mut results: ResMut<ActionResults>) {
    results.0.clear();
}

#[allow(clippy::too_many_arguments)]
fn process_actions(
    inbox: Res<ActionInbox>,
    settings: Res<ContestSettings>,
    directories: Res<Directories>,
    clock: Res<ContestClock>,
    mut claims: ResMut<ClaimEngine>,
    mut sieges: ResMut<SiegeEngine>,
    mut results: ResMut<ActionResults>,
    mut notices: MessageWriter<NoticeMessage>,
    mut ownership: MessageWriter<OwnershipChanged>,
) {
    for action in inbox.drain() {
        let mut effects = ActionEffects::default();
        let outcome = apply_action(
            &action,
            &mut claims,
            &mut sieges,
            &settings.0,
            directories.0.as_ref(),
            clock.time,
            &mut effects,
        );
        if let ActionOutcome::Rejected { reason } = &outcome {
            tracing::debug!(?action, %reason, "action rejected");
        }
        for change in effects.ownership {
            ownership.write(change);
        }
        for notice in effects.notices {
            notices.write(notice);
        }
        results.0.push(ActionResult { action, outcome });
    }
}

fn rejected(reason: RejectReason) -> ActionOutcome {
    ActionOutcome::Rejected { reason }
}

/// Apply one action to both engines.
pub fn apply_action(
    action: &ContestAction,
    claims: &mut ClaimEngine,
    sieges: &mut SiegeEngine,
    config: &ContestConfig,
    directory: &dyn Directory,
    now: WallTime,
    effects: &mut ActionEffects,
) -> ActionOutcome {
    match action {
        ContestAction::InitiateClaim {
            territory_id,
            players,
        } => {
            let Some(territory) = directory.territory(*territory_id) else {
                tracing::error!(territory_id, "failed to resolve territory to claim");
                return rejected(RejectReason::UnknownTerritory);
            };
            let faction_id = match claim_initiation_check(
                claims,
                sieges,
                territory.as_ref(),
                players,
                directory,
                &config.claim,
            ) {
                Ok(faction_id) => faction_id,
                Err(reason) => return rejected(reason),
            };
            if claims.initiate(*territory_id, faction_id) {
                ActionOutcome::Applied
            } else {
                rejected(RejectReason::AlreadyContested)
            }
        }
        ContestAction::ProgressClaim {
            territory_id,
            players,
            amount,
        } => {
            if !amount.is_finite() {
                tracing::error!(territory_id, amount, "claim progress amount is not finite");
                return rejected(RejectReason::InvalidAmount);
            }
            if !claims.can_progress(*territory_id, players) {
                return rejected(RejectReason::NotEligible);
            }
            let progress = claims.apply_progress(*territory_id, *amount);
            if let ClaimProgress::Captured {
                faction_id,
                previous_owner,
            } = progress
            {
                let (change, notice) = capture_messages(*territory_id, faction_id, previous_owner);
                effects.ownership.push(change);
                effects.notices.push(notice);
            }
            ActionOutcome::Progressed(progress)
        }
        ContestAction::DeclareSiege {
            attacker_id,
            territory_id,
        } => {
            if directory.territory(*territory_id).is_none() {
                tracing::error!(territory_id, "failed to resolve territory to besiege");
                return rejected(RejectReason::UnknownTerritory);
            }
            if directory.faction(*attacker_id).is_none() {
                tracing::error!(
                    territory_id,
                    faction_id = attacker_id,
                    "failed to resolve besieging faction"
                );
                return rejected(RejectReason::UnknownFaction);
            }
            if let Err(reason) = siege_declaration_check(claims, sieges, *attacker_id, *territory_id)
            {
                return rejected(reason);
            }
            if sieges.declare(*attacker_id, *territory_id, now) {
                ActionOutcome::Applied
            } else {
                rejected(RejectReason::AlreadyBesieged)
            }
        }
        ContestAction::RemoveFaction { faction_id } => {
            claims.remove_faction(*faction_id);
            sieges.remove_faction(*faction_id);
            tracing::info!(faction_id, "faction removed from contests");
            ActionOutcome::Applied
        }
        ContestAction::RemoveTerritory { territory_id } => {
            claims.remove_territory(*territory_id);
            sieges.remove_territory(*territory_id);
            tracing::info!(territory_id, "territory removed from contests");
            ActionOutcome::Applied
        }
    }
}
