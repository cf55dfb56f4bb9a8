//! Drives the renderer and audio collaborators from simulation state.
//!
//! Chained systems (Reactions phase):
//! 1. `sync_building_visuals`: reload a building's visual whenever its level
//!    differs from the level currently shown
//! 2. `retire_destroyed_visuals`: remove visuals left behind by destroyed
//!    buildings
//! 3. `show_strike_effects`: place an effect for each new strike
//! 4. `clear_finished_strikes`: remove effects and strike entities once done
//! 5. `play_audio_cues`: one cue per reactive event
//!
//! Asset failures are logged and never reach the simulation.

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::MessageReader;
use bevy_ecs::query::Without;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Commands, Query, Res, ResMut};

use crate::ecs::clock::GameClock;
use crate::ecs::collaborators::{Audio, Renderer, SoundCue, VisualRequest};
use crate::ecs::components::{Building, DisasterStrike, EffectVisual, StrikePhase, Visual};
use crate::ecs::events::GameEvent;
use crate::ecs::resources::{EcsCatalog, EcsTileGrid};
use crate::ecs::schedule::{GamePhase, GameTick};
use crate::model::BuildingCatalog;

pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            GameTick,
            (
                sync_building_visuals,
                retire_destroyed_visuals,
                show_strike_effects,
                clear_finished_strikes,
                play_audio_cues,
            )
                .chain()
                .in_set(GamePhase::Reactions),
        );
    }
}

/// What the renderer should show for `building` at its current level, or
/// `None` when the catalog has no asset for that level.
pub fn visual_request(
    catalog: &BuildingCatalog,
    grid: &EcsTileGrid,
    building: &Building,
) -> Option<VisualRequest> {
    let entry = catalog.get(building.kind)?;
    let asset_path = entry.model_path(building.level)?.to_string();
    let position = grid
        .building_position(building.tile)?
        .raised(entry.visual.offset_y);
    Some(VisualRequest {
        asset_path,
        position,
        scale: entry.visual.scale,
    })
}

fn sync_building_visuals(
    mut renderer: ResMut<Renderer>,
    catalog: Res<EcsCatalog>,
    grid: Res<EcsTileGrid>,
    mut buildings: Query<(&Building, &mut Visual)>,
) {
    for (building, mut visual) in &mut buildings {
        if visual.shown_level == building.level {
            continue;
        }
        if let Some(old) = visual.handle.take() {
            renderer.0.remove_visual(old);
        }
        visual.shown_level = building.level;

        let Some(request) = visual_request(&catalog.0, &grid, building) else {
            tracing::warn!(building = building.id, kind = %building.kind, level = building.level, "no model for level");
            continue;
        };
        match renderer.0.place_visual(building.id, &request) {
            Ok(handle) => visual.handle = Some(handle),
            Err(err) => {
                tracing::warn!(building = building.id, %err, "failed to load building model");
            }
        }
    }
}

fn retire_destroyed_visuals(mut events: MessageReader<GameEvent>, mut renderer: ResMut<Renderer>) {
    for event in events.read() {
        if let GameEvent::BuildingDestroyed {
            visual: Some(handle),
            ..
        } = event
        {
            renderer.0.remove_visual(*handle);
        }
    }
}

fn show_strike_effects(
    mut renderer: ResMut<Renderer>,
    strikes: Query<(Entity, &DisasterStrike), Without<EffectVisual>>,
    mut commands: Commands,
) {
    for (entity, strike) in &strikes {
        let handle = if strike.phase == StrikePhase::Aborted {
            None
        } else {
            match renderer.0.place_effect(strike.kind, strike.position) {
                Ok(handle) => Some(handle),
                Err(err) => {
                    tracing::warn!(kind = %strike.kind, %err, "failed to load disaster effect");
                    None
                }
            }
        };
        commands.entity(entity).insert(EffectVisual(handle));
    }
}

fn clear_finished_strikes(
    clock: Res<GameClock>,
    mut renderer: ResMut<Renderer>,
    strikes: Query<(Entity, &DisasterStrike, Option<&EffectVisual>)>,
    mut commands: Commands,
) {
    let now = clock.elapsed_ms;
    for (entity, strike, effect) in &strikes {
        let done = strike.phase == StrikePhase::Aborted || strike.is_finished(now);
        if !done {
            continue;
        }
        if let Some(handle) = effect.and_then(|e| e.0) {
            renderer.0.remove_visual(handle);
        }
        commands.entity(entity).despawn();
    }
}

fn play_audio_cues(mut events: MessageReader<GameEvent>, mut audio: ResMut<Audio>) {
    for event in events.read() {
        let cue = match event {
            GameEvent::BuildingPlaced { .. } => SoundCue::Build,
            GameEvent::BuildingUpgraded { .. } => SoundCue::Upgrade,
            GameEvent::BuildingDowngraded { .. } => SoundCue::Downgrade,
            GameEvent::BuildingDestroyed { .. } => SoundCue::Destroyed,
            GameEvent::DisasterStarted { kind, .. } => SoundCue::Disaster(*kind),
            GameEvent::CommandRejected { .. } => SoundCue::Denied,
            GameEvent::GameEnded { .. } => SoundCue::Victory,
            GameEvent::StrikeAborted { .. } => continue,
        };
        audio.0.play_sound(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BuildingKind, GridConfig, TileId, WorldPos};

    #[test]
    fn request_uses_level_model_and_offsets() {
        let catalog = BuildingCatalog::standard();
        let grid = EcsTileGrid::new(GridConfig::default());
        let building = Building {
            id: 3,
            kind: BuildingKind::Quarry,
            tile: TileId(0),
            level: 2,
            placed_ms: 0,
        };
        let request = visual_request(&catalog, &grid, &building).unwrap();
        assert_eq!(request.asset_path, "models/quarry_2.gltf");
        assert_eq!(request.position, WorldPos::new(-25.0, 1.25, -25.0));
        assert_eq!(request.scale, 0.5);
    }

    #[test]
    fn missing_level_has_no_request() {
        let catalog = BuildingCatalog::standard();
        let grid = EcsTileGrid::new(GridConfig::default());
        let building = Building {
            id: 3,
            kind: BuildingKind::NuclearPlant,
            tile: TileId(0),
            level: 3,
            placed_ms: 0,
        };
        assert!(visual_request(&catalog, &grid, &building).is_none());
    }
}
