#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use bevy_app::App;
use bevy_ecs::entity::Entity;
use bevy_ecs::query::With;
use bevy_ecs::world::World;

use colony_sim::GameConfig;
use colony_sim::ecs::{
    AudioPlayer, Building, EcsLedger, EcsTileGrid, MainBuilding, PickTarget, Pointer,
    SceneRenderer, SoundCue, VisualHandle, VisualRequest, build_game_app,
};
use colony_sim::model::{AssetLoadError, DisasterKind, Ledger, PolicySet, WorldPos};
use colony_sim::{ResourceBundle, ResourceKind, TileId};

/// Default config with the random disaster roll switched off.
pub fn quiet_config() -> GameConfig {
    GameConfig {
        disaster_probability: 0.0,
        ..GameConfig::default()
    }
}

/// Quiet config where disasters only hit buildings of matching resource
/// categories, which makes targets predictable.
pub fn categorized_config() -> GameConfig {
    GameConfig {
        eligibility: PolicySet::Categorized,
        ..quiet_config()
    }
}

pub fn quiet_app() -> App {
    build_game_app(quiet_config()).unwrap()
}

pub fn set_ledger(world: &mut World, amounts: &[(ResourceKind, u32)]) {
    let bundle = amounts
        .iter()
        .fold(ResourceBundle::new(), |b, (k, a)| b.with(*k, *a));
    world.resource_mut::<EcsLedger>().0 = Ledger::from_bundle(&bundle);
}

pub fn make_rich(world: &mut World) {
    set_ledger(
        world,
        &[
            (ResourceKind::Wood, 100_000),
            (ResourceKind::Stone, 100_000),
            (ResourceKind::Iron, 100_000),
            (ResourceKind::Humans, 1_000),
            (ResourceKind::Food, 1_000),
        ],
    );
}

pub fn ledger(app: &App) -> Ledger {
    app.world().resource::<EcsLedger>().0
}

pub fn occupant(app: &App, tile: TileId) -> Option<Entity> {
    app.world()
        .resource::<EcsTileGrid>()
        .get(tile)
        .and_then(|t| t.occupant())
}

pub fn main_entity(world: &mut World) -> Entity {
    world
        .query_filtered::<Entity, With<MainBuilding>>()
        .single(world)
        .unwrap()
}

pub fn level(app: &App, building: Entity) -> Option<u8> {
    app.world().get::<Building>(building).map(|b| b.level)
}

/// Everything the recording collaborators were asked to do.
#[derive(Debug, Default)]
pub struct CollaboratorLog {
    pub placed: Vec<(u64, String)>,
    pub removed: Vec<VisualHandle>,
    pub effects: Vec<(DisasterKind, VisualHandle)>,
    pub sounds: Vec<SoundCue>,
    pub next_handle: u64,
}

impl CollaboratorLog {
    fn issue(&mut self) -> VisualHandle {
        self.next_handle += 1;
        VisualHandle(self.next_handle)
    }
}

/// Renderer that records calls, optionally fails every model load, and
/// answers picks with a fixed target.
pub struct RecordingRenderer {
    pub log: Arc<Mutex<CollaboratorLog>>,
    pub fail_models: bool,
    pub pick: Option<PickTarget>,
}

impl SceneRenderer for RecordingRenderer {
    fn place_visual(
        &mut self,
        building_id: u64,
        request: &VisualRequest,
    ) -> Result<VisualHandle, AssetLoadError> {
        if self.fail_models {
            return Err(AssetLoadError {
                path: request.asset_path.clone(),
                reason: "not found".to_string(),
            });
        }
        let mut log = self.log.lock().unwrap();
        log.placed.push((building_id, request.asset_path.clone()));
        Ok(log.issue())
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        self.log.lock().unwrap().removed.push(handle);
    }

    fn place_effect(
        &mut self,
        kind: DisasterKind,
        _position: WorldPos,
    ) -> Result<VisualHandle, AssetLoadError> {
        let mut log = self.log.lock().unwrap();
        let handle = log.issue();
        log.effects.push((kind, handle));
        Ok(handle)
    }

    fn pick_at(&self, _pointer: Pointer) -> Option<PickTarget> {
        self.pick
    }
}

pub struct RecordingAudio {
    pub log: Arc<Mutex<CollaboratorLog>>,
}

impl AudioPlayer for RecordingAudio {
    fn play_sound(&mut self, cue: SoundCue) {
        self.log.lock().unwrap().sounds.push(cue);
    }
}

pub fn recording(
    fail_models: bool,
    pick: Option<PickTarget>,
) -> (
    Arc<Mutex<CollaboratorLog>>,
    Box<RecordingRenderer>,
    Box<RecordingAudio>,
) {
    let log = Arc::new(Mutex::new(CollaboratorLog::default()));
    let renderer = Box::new(RecordingRenderer {
        log: log.clone(),
        fail_models,
        pick,
    });
    let audio = Box::new(RecordingAudio { log: log.clone() });
    (log, renderer, audio)
}
