use bevy_app::{App, Plugin};

use super::systems::actions::ActionsPlugin;
use super::systems::claims::ClaimsPlugin;
use super::systems::notices::NoticesPlugin;
use super::systems::ownership::OwnershipPlugin;
use super::systems::sieges::SiegesPlugin;

/// Aggregate plugin that installs every contest system.
pub struct ContestPlugin;

impl Plugin for ContestPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            ActionsPlugin,
            ClaimsPlugin,
            SiegesPlugin,
            OwnershipPlugin,
            NoticesPlugin,
        ));
    }
}
