use bevy_app::{App, Plugin};
use bevy_ecs::message::MessageReader;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::Res;

use crate::ecs::messages::{NoticeMessage, NoticeRecipient};
use crate::ecs::resources::Directories;
use crate::ecs::schedule::{ContestPhase, ContestTick};
use crate::engine::Directory;

pub struct NoticesPlugin;

impl Plugin for NoticesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            ContestTick,
            deliver_notices.in_set(ContestPhase::Reactions),
        );
    }
}

/// Hand one notice to its faction, or broadcast it. A faction that no longer
/// resolves only loses this notice.
pub fn deliver_notice(message: &NoticeMessage, directory: &dyn Directory) {
    match message.recipient {
        NoticeRecipient::Faction(faction_id) => match directory.faction(faction_id) {
            Some(faction) => faction.notify(&message.notice),
            None => tracing::error!(
                territory_id = message.notice.territory_id(),
                faction_id,
                "failed to resolve faction for notice"
            ),
        },
        NoticeRecipient::Everyone => directory.broadcast(&message.notice),
    }
}

fn deliver_notices(mut notices: MessageReader<NoticeMessage>, directories: Res<Directories>) {
    for message in notices.read() {
        deliver_notice(message, directories.0.as_ref());
    }
}
