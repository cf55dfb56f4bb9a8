use bevy_ecs::entity::Entity;
use bevy_ecs::message::Messages;
use bevy_ecs::world::World;

use crate::ecs::clock::GameClock;
use crate::ecs::events::GameEvent;
use crate::ecs::resources::{EcsIdGenerator, EventLog, GameOutcome};
use crate::model::{BuildingKind, CommandError, EventKind, TileId};

use super::apply_buildings;
use super::{CommandSource, GameCommand, GameCommandKind};

/// What an applied command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Built(Entity),
    Upgraded { level: u8 },
    Downgraded { level: u8 },
    Destroyed,
    /// Accepted, but nothing about any building changed.
    Unchanged,
}

/// Context passed to all `apply_*` sub-functions, providing the audit trail
/// and reactive-event queue without requiring those resources to stay in the
/// World.
pub(crate) struct ApplyCtx {
    pub event_log: EventLog,
    pub id_gen: EcsIdGenerator,
    pub now_ms: u64,
    pub reactive_events: Vec<GameEvent>,
}

impl ApplyCtx {
    fn extract(world: &mut World) -> Self {
        Self {
            event_log: world.remove_resource::<EventLog>().unwrap_or_default(),
            id_gen: world.remove_resource::<EcsIdGenerator>().unwrap_or_default(),
            now_ms: world.resource::<GameClock>().elapsed_ms,
            reactive_events: Vec::new(),
        }
    }

    /// Put the extracted resources back and publish queued reactive events.
    fn restore(mut self, world: &mut World) {
        let reactive_events = std::mem::take(&mut self.reactive_events);
        if let Some(mut messages) = world.get_resource_mut::<Messages<GameEvent>>() {
            messages.write_batch(reactive_events);
        }
        world.insert_resource(self.event_log);
        world.insert_resource(self.id_gen);
    }

    /// Record an EventLog entry at the current time. Returns its id.
    pub(crate) fn record(
        &mut self,
        kind: EventKind,
        description: impl Into<String>,
        data: serde_json::Value,
    ) -> u64 {
        self.event_log
            .record(&mut self.id_gen.0, kind, self.now_ms, description, data)
    }

    /// Queue a reactive event for emission after all commands are processed.
    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.reactive_events.push(event);
    }

    fn apply(&mut self, world: &mut World, cmd: &GameCommand) -> Result<CommandOutcome, CommandError> {
        // The terminal state is final, including for commands queued earlier
        // in the tick that ended the game.
        let result = if world.resource::<GameOutcome>().is_over() {
            Err(CommandError::GameOver)
        } else {
            self.dispatch(world, cmd)
        };
        if let Err(err) = result {
            self.reject(cmd, err);
        }
        result
    }

    fn dispatch(&mut self, world: &mut World, cmd: &GameCommand) -> Result<CommandOutcome, CommandError> {
        match &cmd.kind {
            GameCommandKind::Build { tile, kind } => {
                apply_buildings::apply_build(self, world, *tile, *kind)
            }
            GameCommandKind::Upgrade { building } => {
                apply_buildings::apply_upgrade(self, world, *building)
            }
            GameCommandKind::Downgrade { building } => {
                apply_buildings::apply_downgrade(self, world, *building)
            }
            GameCommandKind::Destroy { building } => {
                apply_buildings::apply_destroy(self, world, *building)
            }
            GameCommandKind::Weaken { building } => {
                apply_buildings::apply_weaken(self, world, *building)
            }
            GameCommandKind::Credit { amounts } => {
                Ok(apply_buildings::apply_credit(world, amounts))
            }
        }
    }

    fn reject(&mut self, cmd: &GameCommand, err: CommandError) {
        let source = match cmd.source {
            CommandSource::Player => "player".to_string(),
            CommandSource::Economy => "economy".to_string(),
            CommandSource::Disaster(kind) => kind.to_string(),
        };
        let event_id = self.record(
            EventKind::CommandRejected,
            err.to_string(),
            serde_json::json!({
                "source": source,
                "command": format!("{:?}", cmd.kind),
                "caused_by": cmd.caused_by,
            }),
        );
        match cmd.source {
            CommandSource::Player => {
                tracing::info!(%err, "command rejected");
                self.emit(GameEvent::CommandRejected {
                    event_id,
                    error: err,
                });
            }
            _ => tracing::debug!(%source, %err, "command had no effect"),
        }
    }
}

/// Apply one command immediately: validate, mutate, record and publish its
/// events. The check and the mutation happen in one step with no other
/// writer able to interleave.
pub fn apply_command(world: &mut World, cmd: &GameCommand) -> Result<CommandOutcome, CommandError> {
    let mut ctx = ApplyCtx::extract(world);
    let result = ctx.apply(world, cmd);
    ctx.restore(world);
    result
}

/// Place a new building of `kind` on `tile`, paying its level-1 cost.
pub fn resolve_build(world: &mut World, tile: TileId, kind: BuildingKind) -> Result<Entity, CommandError> {
    match apply_command(world, &GameCommand::player(GameCommandKind::Build { tile, kind }))? {
        CommandOutcome::Built(entity) => Ok(entity),
        _ => Err(CommandError::UnknownBuilding),
    }
}

/// Raise `building` one level, paying the next level's cost. Returns the new
/// level.
pub fn resolve_upgrade(world: &mut World, building: Entity) -> Result<u8, CommandError> {
    match apply_command(world, &GameCommand::player(GameCommandKind::Upgrade { building }))? {
        CommandOutcome::Upgraded { level } => Ok(level),
        _ => Err(CommandError::UnknownBuilding),
    }
}

/// Lower `building` one level, destroying ordinary buildings at level 1.
pub fn resolve_downgrade(world: &mut World, building: Entity) -> Result<CommandOutcome, CommandError> {
    apply_command(world, &GameCommand::player(GameCommandKind::Downgrade { building }))
}

/// Exclusive system that drains all pending `GameCommand` messages, applies
/// state changes in arrival order, records the audit trail, and emits
/// `GameEvent` messages.
///
/// Runs in `GamePhase::PostUpdate`.
pub fn apply_game_commands(world: &mut World) {
    let commands: Vec<GameCommand> = {
        let Some(mut messages) = world.get_resource_mut::<Messages<GameCommand>>() else {
            return;
        };
        messages.drain().collect()
    };

    if commands.is_empty() {
        return;
    }

    let mut ctx = ApplyCtx::extract(world);
    for cmd in &commands {
        // Rejections are already logged and recorded.
        let _ = ctx.apply(world, cmd);
    }
    ctx.restore(world);
}

#[cfg(test)]
mod tests {
    use bevy_ecs::message::Messages;

    use super::*;
    use crate::config::GameConfig;
    use crate::ecs::app::build_game_app;
    use crate::ecs::components::{Building, MainBuilding};
    use crate::ecs::resources::{BuildingIndex, EcsLedger, EcsTileGrid, GameOutcome};
    use crate::ecs::schedule::GameTick;
    use crate::model::{ResourceBundle, ResourceKind};

    fn app() -> bevy_app::App {
        build_game_app(GameConfig::default()).unwrap()
    }

    fn main_building(world: &mut World) -> Entity {
        world
            .query_filtered::<Entity, bevy_ecs::query::With<MainBuilding>>()
            .single(world)
            .unwrap()
    }

    fn rich(world: &mut World) {
        world.resource_mut::<EcsLedger>().0 = crate::model::Ledger::from_bundle(
            &ResourceBundle::from([
                (ResourceKind::Wood, 10_000),
                (ResourceKind::Stone, 10_000),
                (ResourceKind::Iron, 10_000),
                (ResourceKind::Humans, 100),
            ]),
        );
    }

    #[test]
    fn build_debits_and_occupies() {
        let mut app = app();
        let world = app.world_mut();
        let entity = resolve_build(world, TileId(0), BuildingKind::Lumberyard).unwrap();

        let ledger = world.resource::<EcsLedger>().0;
        assert_eq!(ledger.get(ResourceKind::Wood), 40);
        assert_eq!(ledger.get(ResourceKind::Stone), 25);
        assert_eq!(ledger.get(ResourceKind::Humans), 9);

        let building = world.get::<Building>(entity).unwrap();
        assert_eq!(building.level, 1);
        assert_eq!(building.tile, TileId(0));
        let grid = world.resource::<EcsTileGrid>();
        assert_eq!(grid.get(TileId(0)).unwrap().occupant(), Some(entity));
        assert_eq!(world.resource::<EventLog>().count(EventKind::Construction), 1);
    }

    #[test]
    fn build_on_occupied_tile_changes_nothing() {
        let mut app = app();
        let world = app.world_mut();
        resolve_build(world, TileId(0), BuildingKind::Quarry).unwrap();
        let before = world.resource::<EcsLedger>().0;
        let count = world.resource::<BuildingIndex>().len();

        let err = resolve_build(world, TileId(0), BuildingKind::House).unwrap_err();
        assert_eq!(err, CommandError::TileOccupied { tile: TileId(0) });
        assert_eq!(world.resource::<EcsLedger>().0, before);
        assert_eq!(world.resource::<BuildingIndex>().len(), count);
        assert_eq!(world.resource::<EventLog>().count(EventKind::CommandRejected), 1);
    }

    #[test]
    fn main_building_cannot_be_built() {
        let mut app = app();
        let world = app.world_mut();
        assert_eq!(
            resolve_build(world, TileId(1), BuildingKind::MainBuilding),
            Err(CommandError::NotBuildable(BuildingKind::MainBuilding))
        );
    }

    #[test]
    fn unaffordable_build_is_rejected() {
        let mut app = app();
        let world = app.world_mut();
        let err = resolve_build(world, TileId(0), BuildingKind::NuclearPlant).unwrap_err();
        assert_eq!(
            err,
            CommandError::InsufficientResources {
                kind: ResourceKind::Stone,
                required: 50,
                available: 30,
            }
        );
        assert!(!world.resource::<EcsTileGrid>().is_occupied(TileId(0)));
    }

    #[test]
    fn upgrade_past_max_is_a_no_op() {
        let mut app = app();
        let world = app.world_mut();
        rich(world);
        let plant = resolve_build(world, TileId(0), BuildingKind::NuclearPlant).unwrap();
        assert_eq!(resolve_upgrade(world, plant), Ok(2));

        let before = world.resource::<EcsLedger>().0;
        assert_eq!(
            resolve_upgrade(world, plant),
            Err(CommandError::MaxLevelReached {
                kind: BuildingKind::NuclearPlant,
                level: 2,
            })
        );
        assert_eq!(world.resource::<EcsLedger>().0, before);
        assert_eq!(world.get::<Building>(plant).unwrap().level, 2);
    }

    #[test]
    fn downgrade_at_level_one_destroys() {
        let mut app = app();
        let world = app.world_mut();
        let house = resolve_build(world, TileId(7), BuildingKind::House).unwrap();
        let id = world.get::<Building>(house).unwrap().id;

        assert_eq!(resolve_downgrade(world, house), Ok(CommandOutcome::Destroyed));
        assert!(world.get::<Building>(house).is_none());
        assert!(!world.resource::<EcsTileGrid>().is_occupied(TileId(7)));
        assert_eq!(world.resource::<BuildingIndex>().get_bevy(id), None);

        // The stale reference is detected, not acted on.
        assert_eq!(
            resolve_downgrade(world, house),
            Err(CommandError::UnknownBuilding)
        );
        assert_eq!(world.resource::<EventLog>().count(EventKind::Destruction), 1);
    }

    #[test]
    fn main_building_has_a_floor() {
        let mut app = app();
        let world = app.world_mut();
        let main = main_building(world);
        assert_eq!(
            resolve_downgrade(world, main),
            Err(CommandError::BelowFloor {
                kind: BuildingKind::MainBuilding
            })
        );
        let destroy = GameCommand::player(GameCommandKind::Destroy { building: main });
        assert!(apply_command(world, &destroy).is_err());
        assert_eq!(world.get::<Building>(main).unwrap().level, 1);
    }

    #[test]
    fn weaken_stops_at_level_one() {
        let mut app = app();
        let world = app.world_mut();
        rich(world);
        let mine = resolve_build(world, TileId(3), BuildingKind::IronMine).unwrap();
        resolve_upgrade(world, mine).unwrap();
        let weaken = GameCommand::player(GameCommandKind::Weaken { building: mine });

        assert_eq!(
            apply_command(world, &weaken),
            Ok(CommandOutcome::Downgraded { level: 1 })
        );
        assert_eq!(apply_command(world, &weaken), Ok(CommandOutcome::Unchanged));
        assert_eq!(world.get::<Building>(mine).unwrap().level, 1);
    }

    #[test]
    fn reaching_max_main_level_ends_game_once() {
        let mut app = app();
        let world = app.world_mut();
        rich(world);
        let main = main_building(world);

        assert_eq!(resolve_upgrade(world, main), Ok(2));
        assert!(!world.resource::<GameOutcome>().is_over());
        assert_eq!(resolve_upgrade(world, main), Ok(3));
        assert!(world.resource::<GameOutcome>().is_over());

        let before = world.resource::<EcsLedger>().0;
        assert_eq!(resolve_upgrade(world, main), Err(CommandError::GameOver));
        assert_eq!(world.resource::<EcsLedger>().0, before);
        assert_eq!(world.resource::<EventLog>().count(EventKind::GameEnded), 1);
    }

    #[test]
    fn queued_commands_apply_in_order_during_tick() {
        let mut app = app();
        {
            let mut messages = app.world_mut().resource_mut::<Messages<GameCommand>>();
            messages.write(GameCommand::player(GameCommandKind::Build {
                tile: TileId(5),
                kind: BuildingKind::Paddy,
            }));
            messages.write(GameCommand::player(GameCommandKind::Build {
                tile: TileId(5),
                kind: BuildingKind::House,
            }));
        }
        app.world_mut().run_schedule(GameTick);

        let world = app.world_mut();
        let occupant = world
            .resource::<EcsTileGrid>()
            .get(TileId(5))
            .and_then(|t| t.occupant())
            .unwrap();
        assert_eq!(world.get::<Building>(occupant).unwrap().kind, BuildingKind::Paddy);
        assert_eq!(world.resource::<EventLog>().count(EventKind::CommandRejected), 1);
    }

    #[test]
    fn credit_is_bookkeeping_only() {
        let mut app = app();
        let world = app.world_mut();
        let entries = world.resource::<EventLog>().entries.len();
        let credit = GameCommand::economy(GameCommandKind::Credit {
            amounts: ResourceBundle::from([(ResourceKind::Food, 3)]),
        });
        assert!(credit.is_bookkeeping());
        apply_command(world, &credit).unwrap();
        assert_eq!(world.resource::<EcsLedger>().0.get(ResourceKind::Food), 43);
        assert_eq!(world.resource::<EventLog>().entries.len(), entries);
    }

    #[test]
    fn nothing_applies_after_game_end() {
        let mut app = app();
        let world = app.world_mut();
        rich(world);
        let main = main_building(world);
        let mine = resolve_build(world, TileId(8), BuildingKind::IronMine).unwrap();
        resolve_upgrade(world, mine).unwrap();
        resolve_upgrade(world, main).unwrap();
        resolve_upgrade(world, main).unwrap();

        let ledger = world.resource::<EcsLedger>().0;
        let late = [
            GameCommand::economy(GameCommandKind::Credit {
                amounts: ResourceBundle::from([(ResourceKind::Food, 3)]),
            }),
            GameCommand::disaster(
                GameCommandKind::Downgrade { building: main },
                crate::model::DisasterKind::Thunder,
                99,
            ),
            GameCommand::disaster(
                GameCommandKind::Weaken { building: mine },
                crate::model::DisasterKind::Earthquake,
                100,
            ),
            GameCommand::disaster(
                GameCommandKind::Destroy { building: mine },
                crate::model::DisasterKind::Meteorite,
                101,
            ),
            GameCommand::player(GameCommandKind::Downgrade { building: mine }),
        ];
        for cmd in &late {
            assert_eq!(apply_command(world, cmd), Err(CommandError::GameOver));
        }
        assert_eq!(world.resource::<EcsLedger>().0, ledger);
        assert_eq!(world.get::<Building>(main).unwrap().level, 3);
        assert_eq!(world.get::<Building>(mine).unwrap().level, 2);
    }
}
