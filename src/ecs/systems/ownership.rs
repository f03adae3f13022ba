use bevy_app::{App, Plugin};
use bevy_ecs::message::MessageReader;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::ResMut;

use crate::ecs::messages::{OwnershipChanged, OwnershipSource};
use crate::ecs::schedule::{ContestPhase, ContestTick};
use crate::engine::{ClaimEngine, SiegeEngine};

pub struct OwnershipPlugin;

impl Plugin for OwnershipPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            ContestTick,
            sync_ownership.in_set(ContestPhase::PostUpdate),
        );
    }
}

/// Mirror an ownership change into the engine that did not make it.
pub fn apply_ownership_change(
    change: &OwnershipChanged,
    claims: &mut ClaimEngine,
    sieges: &mut SiegeEngine,
) {
    match change.source {
        OwnershipSource::Claim => sieges.set_owner(change.territory_id, change.faction_id),
        OwnershipSource::Siege => claims.set_owner(change.territory_id, change.faction_id),
    }
}

fn sync_ownership(
    mut changes: MessageReader<OwnershipChanged>,
    mut claims: ResMut<ClaimEngine>,
    mut sieges: ResMut<SiegeEngine>,
) {
    for change in changes.read() {
        apply_ownership_change(change, &mut claims, &mut sieges);
    }
}
