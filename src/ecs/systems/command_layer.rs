//! Command layer: turns picked tiles and buildings into build and upgrade
//! commands according to the current `CommandMode`.
//!
//! One system (Input domain set):
//! 1. `resolve_player_input`: mode changes and pick resolution

use bevy_app::{App, Plugin};
use bevy_ecs::message::{MessageReader, MessageWriter};
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Res, ResMut};

use crate::ecs::commands::{GameCommand, GameCommandKind};
use crate::ecs::events::{PlayerInput, TriggerDisaster};
use crate::ecs::resources::{CommandMode, EcsTileGrid, GameOutcome, Mode};
use crate::ecs::schedule::{DomainSet, GameTick};

pub struct CommandLayerPlugin;

impl Plugin for CommandLayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(GameTick, resolve_player_input.in_set(DomainSet::Input));
    }
}

fn resolve_player_input(
    mut inputs: MessageReader<PlayerInput>,
    mut mode: ResMut<CommandMode>,
    grid: Res<EcsTileGrid>,
    outcome: Res<GameOutcome>,
    mut commands: MessageWriter<GameCommand>,
    mut disasters: MessageWriter<TriggerDisaster>,
) {
    for input in inputs.read() {
        match *input {
            PlayerInput::SetMode(next) => mode.set_mode(next),
            PlayerInput::SelectBuildingType(kind) => mode.select(kind),
            PlayerInput::EnterUpgradeMode => mode.set_mode(Mode::Upgrade),
            _ if outcome.is_over() => {
                tracing::info!(?input, "game is over, input ignored");
            }
            PlayerInput::TilePicked(tile) => match mode.mode {
                Mode::Build => {
                    let Some(kind) = mode.selected else {
                        tracing::debug!(%tile, "tile picked with no building type selected");
                        continue;
                    };
                    commands.write(GameCommand::player(GameCommandKind::Build { tile, kind }));
                }
                Mode::Upgrade => {
                    let Some(building) = grid.get(tile).and_then(|t| t.occupant()) else {
                        tracing::debug!(%tile, "empty tile picked in upgrade mode");
                        continue;
                    };
                    mode.hovered = Some(building);
                    commands.write(GameCommand::player(GameCommandKind::Upgrade { building }));
                }
            },
            PlayerInput::BuildingPicked(building) => match mode.mode {
                Mode::Build => {
                    tracing::debug!(?building, "building picked in build mode");
                }
                Mode::Upgrade => {
                    mode.hovered = Some(building);
                    commands.write(GameCommand::player(GameCommandKind::Upgrade { building }));
                }
            },
            PlayerInput::TriggerDisaster(kind) => {
                disasters.write(TriggerDisaster { kind, manual: true });
            }
        }
    }
}
