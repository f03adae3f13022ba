use bevy_app::{App, Plugin};
use bevy_ecs::message::MessageWriter;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Res, ResMut};

use crate::ecs::conditions::{claims_pending, minute_elapsed};
use crate::ecs::messages::{NoticeMessage, OwnershipChanged, OwnershipSource};
use crate::ecs::resources::{ContestSettings, Directories};
use crate::ecs::schedule::{ContestTick, DomainSet};
use crate::engine::ClaimEngine;
use crate::model::{ClaimProgress, ContestNotice, FactionId, TerritoryId};

pub struct ClaimsPlugin;

impl Plugin for ClaimsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            ContestTick,
            claim_minute_tick
                .run_if(minute_elapsed)
                .run_if(claims_pending)
                .in_set(DomainSet::Claims),
        );
    }
}

/// The ownership change and the broadcast that follow a completed claim.
pub(crate) fn capture_messages(
    territory_id: TerritoryId,
    faction_id: FactionId,
    previous_owner: Option<FactionId>,
) -> (OwnershipChanged, NoticeMessage) {
    let change = OwnershipChanged {
        territory_id,
        faction_id,
        source: OwnershipSource::Claim,
    };
    let notice = NoticeMessage::to_everyone(ContestNotice::TerritoryClaimed {
        territory_id,
        faction_id,
        previous_owner,
    });
    (change, notice)
}

fn claim_minute_tick(
    settings: Res<ContestSettings>,
    directories: Res<Directories>,
    mut claims: ResMut<ClaimEngine>,
    mut notices: MessageWriter<NoticeMessage>,
    mut ownership: MessageWriter<OwnershipChanged>,
) {
    let outcomes = claims.minute_tick(directories.0.as_ref(), &settings.0.claim);
    for (territory_id, outcome) in outcomes {
        if let ClaimProgress::Captured {
            faction_id,
            previous_owner,
        } = outcome
        {
            let (change, notice) = capture_messages(territory_id, faction_id, previous_owner);
            ownership.write(change);
            notices.write(notice);
        }
    }
}
