use bevy_app::{App, Plugin};
use bevy_ecs::message::MessageWriter;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Res, ResMut};

use crate::ecs::clock::ContestClock;
use crate::ecs::conditions::sieges_pending;
use crate::ecs::messages::{NoticeMessage, OwnershipChanged, OwnershipSource};
use crate::ecs::resources::{ContestSettings, Directories};
use crate::ecs::schedule::{ContestTick, DomainSet};
use crate::engine::SiegeEngine;
use crate::model::{ContestNotice, SiegeEvent, SiegeSide};

pub struct SiegesPlugin;

impl Plugin for SiegesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            ContestTick,
            siege_second_tick
                .run_if(sieges_pending)
                .in_set(DomainSet::Sieges),
        );
    }
}

/// Notices for both sides of a siege event. The defending side is only
/// addressed when the territory has an owner.
pub(crate) fn siege_notices(event: &SiegeEvent) -> Vec<NoticeMessage> {
    let mut messages = Vec::with_capacity(2);
    match *event {
        SiegeEvent::Reminder {
            territory_id,
            attacker_id,
            defender_id,
            remaining_minutes,
            ..
        } => {
            let reminder = |side| ContestNotice::SiegeReminder {
                territory_id,
                side,
                remaining_minutes,
            };
            messages.push(NoticeMessage::to_faction(
                attacker_id,
                reminder(SiegeSide::Attacking),
            ));
            if let Some(defender_id) = defender_id {
                messages.push(NoticeMessage::to_faction(
                    defender_id,
                    reminder(SiegeSide::Defending),
                ));
            }
        }
        SiegeEvent::Succeeded {
            territory_id,
            attacker_id,
            defender_id,
        } => {
            messages.push(NoticeMessage::to_faction(
                attacker_id,
                ContestNotice::SiegeWon {
                    territory_id,
                    side: SiegeSide::Attacking,
                },
            ));
            if let Some(defender_id) = defender_id {
                messages.push(NoticeMessage::to_faction(
                    defender_id,
                    ContestNotice::SiegeLost {
                        territory_id,
                        side: SiegeSide::Defending,
                    },
                ));
            }
        }
        SiegeEvent::Failed {
            territory_id,
            attacker_id,
            defender_id,
        } => {
            messages.push(NoticeMessage::to_faction(
                attacker_id,
                ContestNotice::SiegeLost {
                    territory_id,
                    side: SiegeSide::Attacking,
                },
            ));
            if let Some(defender_id) = defender_id {
                messages.push(NoticeMessage::to_faction(
                    defender_id,
                    ContestNotice::SiegeWon {
                        territory_id,
                        side: SiegeSide::Defending,
                    },
                ));
            }
        }
    }
    messages
}

fn siege_second_tick(
    clock: Res<ContestClock>,
    settings: Res<ContestSettings>,
    directories: Res<Directories>,
    mut sieges: ResMut<SiegeEngine>,
    mut notices: MessageWriter<NoticeMessage>,
    mut ownership: MessageWriter<OwnershipChanged>,
) {
    let events = sieges.second_tick(clock.time, directories.0.as_ref(), &settings.0.siege);
    for event in events {
        if let SiegeEvent::Succeeded {
            territory_id,
            attacker_id,
            ..
        } = event
        {
            ownership.write(OwnershipChanged {
                territory_id,
                faction_id: attacker_id,
                source: OwnershipSource::Siege,
            });
        }
        for message in siege_notices(&event) {
            notices.write(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::messages::NoticeRecipient;
    use crate::model::ReminderPhase;

    #[test]
    fn reminder_without_owner_only_reaches_attacker() {
        let messages = siege_notices(&SiegeEvent::Reminder {
            territory_id: 1,
            attacker_id: 20,
            defender_id: None,
            remaining_minutes: 30,
            phase: ReminderPhase::Distant,
        });
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].recipient, NoticeRecipient::Faction(20));
    }

    #[test]
    fn outcomes_tell_each_side_something_different() {
        let won = siege_notices(&SiegeEvent::Succeeded {
            territory_id: 1,
            attacker_id: 20,
            defender_id: Some(10),
        });
        assert_eq!(
            won,
            vec![
                NoticeMessage::to_faction(
                    20,
                    ContestNotice::SiegeWon {
                        territory_id: 1,
                        side: SiegeSide::Attacking
                    }
                ),
                NoticeMessage::to_faction(
                    10,
                    ContestNotice::SiegeLost {
                        territory_id: 1,
                        side: SiegeSide::Defending
                    }
                ),
            ]
        );

        let failed = siege_notices(&SiegeEvent::Failed {
            territory_id: 1,
            attacker_id: 20,
            defender_id: Some(10),
        });
        assert!(matches!(
            failed[0].notice,
            ContestNotice::SiegeLost {
                side: SiegeSide::Attacking,
                ..
            }
        ));
        assert!(matches!(
            failed[1].notice,
            ContestNotice::SiegeWon {
                side: SiegeSide::Defending,
                ..
            }
        ));
    }
}
