use bevy_app::{App, Plugin};

use super::systems::command_layer::CommandLayerPlugin;
use super::systems::disasters::DisastersPlugin;
use super::systems::economy::EconomyPlugin;
use super::systems::presentation::PresentationPlugin;

/// Aggregate plugin that installs every game domain plugin.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            CommandLayerPlugin,
            EconomyPlugin,
            DisastersPlugin,
            PresentationPlugin,
        ));
    }
}
