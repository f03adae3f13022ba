use bevy_ecs::message::Message;

use crate::model::{ContestNotice, FactionId, TerritoryId};

/// Who a notice is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeRecipient {
    Faction(FactionId),
    Everyone,
}

/// A notice waiting for delivery in `ContestPhase::Reactions`.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct NoticeMessage {
    pub recipient: NoticeRecipient,
    pub notice: ContestNotice,
}

impl NoticeMessage {
    pub fn to_faction(faction_id: FactionId, notice: ContestNotice) -> Self {
        Self {
            recipient: NoticeRecipient::Faction(faction_id),
            notice,
        }
    }

    pub fn to_everyone(notice: ContestNotice) -> Self {
        Self {
            recipient: NoticeRecipient::Everyone,
            notice,
        }
    }
}

/// Which engine decided an ownership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipSource {
    Claim,
    Siege,
}

/// A territory changed hands. The other engine picks this up in
/// `ContestPhase::PostUpdate`.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipChanged {
    pub territory_id: TerritoryId,
    pub faction_id: FactionId,
    pub source: OwnershipSource,
}
