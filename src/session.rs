//! Host-facing session wrapper around the headless game app.

use std::time::Duration;

use bevy_app::App;
use bevy_ecs::entity::Entity;
use bevy_ecs::message::Messages;
use bevy_ecs::world::World;

use crate::config::GameConfig;
use crate::ecs::app::build_game_app_with_catalog;
use crate::ecs::clock::GameClock;
use crate::ecs::collaborators::{
    Audio, AudioPlayer, PickTarget, Pointer, Renderer, SceneRenderer,
};
use crate::ecs::commands::{resolve_build, resolve_upgrade};
use crate::ecs::components::{Building, MainBuilding};
use crate::ecs::events::PlayerInput;
use crate::ecs::resources::{
    BuildingIndex, CommandMode, EcsCatalog, EcsLedger, EventLog, GameOutcome, Mode,
};
use crate::ecs::schedule::GameTick;
use crate::model::{BuildingCatalog, BuildingKind, CommandError, ConfigError, Ledger, ResourceBundle, TileId};

/// One running game. Created at session start, dropped at session end.
pub struct GameSession {
    app: App,
    /// Simulated time handed to `advance` that has not yet filled a tick.
    pending_ms: u64,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_catalog(config, BuildingCatalog::standard())
    }

    pub fn with_catalog(config: GameConfig, catalog: BuildingCatalog) -> Result<Self, ConfigError> {
        Ok(Self {
            app: build_game_app_with_catalog(config, catalog)?,
            pending_ms: 0,
        })
    }

    /// Replace the no-op renderer and audio player.
    pub fn with_collaborators(
        mut self,
        renderer: Box<dyn SceneRenderer>,
        audio: Box<dyn AudioPlayer>,
    ) -> Self {
        self.app.insert_resource(Renderer(renderer));
        self.app.insert_resource(Audio(audio));
        self
    }

    /// Run one fixed step.
    pub fn tick(&mut self) {
        self.app.world_mut().run_schedule(GameTick);
    }

    /// Feed wall-clock time in; runs as many whole ticks as it covers and
    /// carries the remainder. Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let tick_ms = self.clock().tick_ms.max(1);
        self.pending_ms = self
            .pending_ms
            .saturating_add(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
        let mut ticks = 0;
        while self.pending_ms >= tick_ms {
            self.pending_ms -= tick_ms;
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// Queue input for the next tick.
    pub fn submit(&mut self, input: PlayerInput) {
        self.app
            .world_mut()
            .resource_mut::<Messages<PlayerInput>>()
            .write(input);
    }

    /// Resolve a pointer through the renderer and queue the resulting pick.
    pub fn click(&mut self, pointer: Pointer) -> Option<PickTarget> {
        let target = self.app.world().resource::<Renderer>().0.pick_at(pointer)?;
        let input = match target {
            PickTarget::Tile(tile) => PlayerInput::TilePicked(tile),
            PickTarget::Building(id) => {
                let Some(entity) = self.app.world().resource::<BuildingIndex>().get_bevy(id) else {
                    tracing::debug!(building = id, "picked building is gone");
                    return None;
                };
                PlayerInput::BuildingPicked(entity)
            }
        };
        self.submit(input);
        Some(target)
    }

    /// Build immediately, outside the tick.
    pub fn build(&mut self, tile: TileId, kind: BuildingKind) -> Result<Entity, CommandError> {
        resolve_build(self.app.world_mut(), tile, kind)
    }

    /// Upgrade immediately, outside the tick. Returns the new level.
    pub fn upgrade(&mut self, building: Entity) -> Result<u8, CommandError> {
        resolve_upgrade(self.app.world_mut(), building)
    }

    pub fn ledger(&self) -> Ledger {
        self.app.world().resource::<EcsLedger>().0
    }

    pub fn mode(&self) -> &CommandMode {
        self.app.world().resource::<CommandMode>()
    }

    /// Cost shown next to the current selection: the build cost of the
    /// selected type in Build mode, the next-level cost of the last picked
    /// building in Upgrade mode.
    pub fn selected_requirements(&self) -> Option<ResourceBundle> {
        let world = self.app.world();
        let catalog = &world.resource::<EcsCatalog>().0;
        let mode = world.resource::<CommandMode>();
        match mode.mode {
            Mode::Build => catalog.get(mode.selected?)?.build_cost().cloned(),
            Mode::Upgrade => {
                let building = world.get::<Building>(mode.hovered?)?;
                catalog
                    .get(building.kind)?
                    .upgrade_cost(building.level)
                    .cloned()
            }
        }
    }

    /// Active buildings in id order.
    pub fn buildings(&self) -> Vec<(Entity, Building)> {
        let world = self.app.world();
        world
            .resource::<BuildingIndex>()
            .entities()
            .filter_map(|entity| world.get::<Building>(entity).map(|b| (entity, b.clone())))
            .collect()
    }

    pub fn main_building(&self) -> Option<(Entity, Building)> {
        self.buildings()
            .into_iter()
            .find(|(entity, _)| self.app.world().get::<MainBuilding>(*entity).is_some())
    }

    pub fn is_game_over(&self) -> bool {
        self.app.world().resource::<GameOutcome>().is_over()
    }

    pub fn event_log(&self) -> &EventLog {
        self.app.world().resource::<EventLog>()
    }

    pub fn clock(&self) -> &GameClock {
        self.app.world().resource::<GameClock>()
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
