use bevy_app::App;
use bevy_ecs::message::MessageRegistry;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs};
use bevy_ecs::world::World;

use super::clock::GameClock;
use super::collaborators::{Audio, Renderer};
use super::commands::{GameCommand, apply_game_commands};
use super::events::{GameEvent, PlayerInput, TriggerDisaster};
use super::plugin::GamePlugin;
use super::resources::{
    BuildingIndex, CommandMode, DisasterRng, EcsCatalog, EcsIdGenerator, EcsLedger, EcsTileGrid,
    EventLog, GameOutcome, GameSeed, distribute_rng,
};
use super::schedule::{GamePhase, configure_game_schedule};
use super::spawn;
use crate::config::GameConfig;
use crate::model::{BuildingCatalog, ConfigError, EventKind, Ledger};

/// Build a headless Bevy app with the standard catalog, every game system,
/// and the main building already placed.
///
/// Manual tick control:
/// ```no_run
/// # use colony_sim::config::GameConfig;
/// # use colony_sim::ecs::{build_game_app, GameTick};
/// let mut app = build_game_app(GameConfig::default()).unwrap();
/// for _ in 0..200 {  // 10 s of 50 ms ticks
///     app.world_mut().run_schedule(GameTick);
/// }
/// ```
pub fn build_game_app(config: GameConfig) -> Result<App, ConfigError> {
    build_game_app_with_catalog(config, BuildingCatalog::standard())
}

/// Build a headless Bevy app with a custom catalog and the single-threaded
/// executor, so runs with the same seed are reproducible.
pub fn build_game_app_with_catalog(
    config: GameConfig,
    catalog: BuildingCatalog,
) -> Result<App, ConfigError> {
    build_game_app_with_executor(config, catalog, ExecutorKind::SingleThreaded)
}

/// Build a headless Bevy app with a specific executor kind.
pub fn build_game_app_with_executor(
    config: GameConfig,
    catalog: BuildingCatalog,
    executor: ExecutorKind,
) -> Result<App, ConfigError> {
    config.validate()?;
    catalog.validate()?;

    let mut app = App::empty();

    // Core resources
    app.insert_resource(GameClock::new(config.tick_ms));
    app.insert_resource(EcsLedger(Ledger::from_bundle(&config.starting_resources)));
    app.insert_resource(EcsTileGrid::new(config.grid.clone()));
    app.insert_resource(EcsCatalog(catalog));
    app.insert_resource(EventLog::new());
    app.insert_resource(EcsIdGenerator::default());
    app.insert_resource(BuildingIndex::new());
    app.insert_resource(GameSeed(config.seed));
    app.init_resource::<DisasterRng>();
    app.init_resource::<GameOutcome>();
    app.init_resource::<CommandMode>();
    app.init_resource::<Renderer>();
    app.init_resource::<Audio>();

    // Register message types
    MessageRegistry::register_message::<PlayerInput>(app.world_mut());
    MessageRegistry::register_message::<TriggerDisaster>(app.world_mut());
    MessageRegistry::register_message::<GameCommand>(app.world_mut());
    MessageRegistry::register_message::<GameEvent>(app.world_mut());

    // Build schedule with message rotation + applicator + RNG distribution
    let mut schedule = configure_game_schedule(executor);
    schedule.add_systems(bevy_ecs::message::message_update_system.in_set(GamePhase::PreUpdate));
    schedule.add_systems(distribute_rng.in_set(GamePhase::PreUpdate));
    schedule.add_systems(apply_game_commands.in_set(GamePhase::PostUpdate));
    app.add_schedule(schedule);
    app.add_plugins(GamePlugin);

    let main_tile = config.grid.tile_id(config.main_building_tile).ok_or_else(|| {
        ConfigError::invalid("main_building_tile", "outside the grid")
    })?;
    app.insert_resource(config);
    setup_world(app.world_mut(), main_tile)?;
    Ok(app)
}

/// Fixed world setup: the main building, free of cost, plus the opening log
/// entry.
fn setup_world(world: &mut World, main_tile: crate::model::TileId) -> Result<(), ConfigError> {
    let id = world.resource_mut::<EcsIdGenerator>().0.next_id();
    spawn::spawn_main_building(world, id, main_tile)
        .map_err(|err| ConfigError::invalid("main_building_tile", err.to_string()))?;

    let ledger = world.resource::<EcsLedger>().0.to_bundle();
    world.resource_scope(|world, mut log: bevy_ecs::world::Mut<EventLog>| {
        let mut id_gen = world.resource_mut::<EcsIdGenerator>();
        log.record(
            &mut id_gen.0,
            EventKind::WorldCreated,
            0,
            "colony founded",
            serde_json::json!({
                "main_building": id,
                "tile": main_tile,
                "resources": ledger,
            }),
        );
    });
    tracing::info!(main_building = id, tile = %main_tile, "world created");
    Ok(())
}
