use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::ecs::components::{Building, MainBuilding, Visual};
use crate::ecs::events::GameEvent;
use crate::ecs::resources::{BuildingIndex, EcsCatalog, EcsLedger, EcsTileGrid, GameOutcome};
use crate::ecs::spawn;
use crate::model::{BuildingKind, CommandError, EventKind, ResourceBundle, TileId};

use super::applicator::{ApplyCtx, CommandOutcome};

fn current(world: &World, building: Entity) -> Result<Building, CommandError> {
    world
        .get::<Building>(building)
        .cloned()
        .ok_or(CommandError::UnknownBuilding)
}

fn is_main(world: &World, entity: Entity, building: &Building) -> bool {
    building.kind == BuildingKind::MainBuilding || world.get::<MainBuilding>(entity).is_some()
}

fn set_level(world: &mut World, entity: Entity, level: u8) {
    if let Some(mut building) = world.get_mut::<Building>(entity) {
        building.level = level;
    }
}

pub(crate) fn apply_build(
    ctx: &mut ApplyCtx,
    world: &mut World,
    tile: TileId,
    kind: BuildingKind,
) -> Result<CommandOutcome, CommandError> {
    let grid = world.resource::<EcsTileGrid>();
    let slot = grid.get(tile).ok_or(CommandError::UnknownTile { tile })?;
    if slot.is_occupied() {
        return Err(CommandError::TileOccupied { tile });
    }

    let cost = world
        .resource::<EcsCatalog>()
        .0
        .get(kind)
        .and_then(|entry| entry.build_cost())
        .cloned()
        .ok_or(CommandError::UnknownBuildingType(kind))?;
    if !kind.is_buildable() {
        return Err(CommandError::NotBuildable(kind));
    }

    let mut ledger = world.resource::<EcsLedger>().0;
    ledger.try_debit(&cost)?;

    let id = ctx.id_gen.0.next_id();
    let entity = spawn::spawn_building(world, id, kind, tile, 1, ctx.now_ms)?;
    world.resource_mut::<EcsLedger>().0 = ledger;

    let event_id = ctx.record(
        EventKind::Construction,
        format!("built {kind} on tile {tile}"),
        serde_json::json!({
            "building": id,
            "kind": kind,
            "tile": tile,
            "cost": cost,
        }),
    );
    tracing::info!(building = id, %kind, %tile, "building placed");
    ctx.emit(GameEvent::BuildingPlaced {
        event_id,
        building: entity,
        kind,
        tile,
    });
    Ok(CommandOutcome::Built(entity))
}

pub(crate) fn apply_upgrade(
    ctx: &mut ApplyCtx,
    world: &mut World,
    entity: Entity,
) -> Result<CommandOutcome, CommandError> {
    let building = current(world, entity)?;

    let catalog = &world.resource::<EcsCatalog>().0;
    let entry = catalog
        .get(building.kind)
        .ok_or(CommandError::UnknownBuildingType(building.kind))?;
    let max_level = entry.max_level();
    let cost: ResourceBundle = entry
        .upgrade_cost(building.level)
        .cloned()
        .ok_or(CommandError::MaxLevelReached {
            kind: building.kind,
            level: building.level,
        })?;

    world.resource_mut::<EcsLedger>().0.try_debit(&cost)?;
    let level = building.level + 1;
    set_level(world, entity, level);

    let event_id = ctx.record(
        EventKind::Upgrade,
        format!("upgraded {} to level {level}", building.kind),
        serde_json::json!({
            "building": building.id,
            "kind": building.kind,
            "level": level,
            "cost": cost,
        }),
    );
    tracing::info!(building = building.id, kind = %building.kind, level, "building upgraded");
    ctx.emit(GameEvent::BuildingUpgraded {
        event_id,
        building: entity,
        level,
    });

    if is_main(world, entity, &building) && level >= max_level {
        end_game(ctx, world, event_id);
    }
    Ok(CommandOutcome::Upgraded { level })
}

/// One-way transition into the terminal state. Only the first call has any
/// effect.
fn end_game(ctx: &mut ApplyCtx, world: &mut World, caused_by: u64) {
    let mut outcome = world.resource_mut::<GameOutcome>();
    if outcome.is_over() {
        return;
    }
    outcome.ended_at_ms = Some(ctx.now_ms);

    let event_id = ctx.record(
        EventKind::GameEnded,
        "the main building reached its final level",
        serde_json::json!({ "caused_by": caused_by }),
    );
    tracing::info!(at_ms = ctx.now_ms, "game ended");
    ctx.emit(GameEvent::GameEnded { event_id });
}

pub(crate) fn apply_downgrade(
    ctx: &mut ApplyCtx,
    world: &mut World,
    entity: Entity,
) -> Result<CommandOutcome, CommandError> {
    let building = current(world, entity)?;
    if building.level > 1 {
        return Ok(lower(ctx, world, entity, &building));
    }
    if is_main(world, entity, &building) {
        return Err(CommandError::BelowFloor {
            kind: building.kind,
        });
    }
    Ok(destroy(ctx, world, entity, &building))
}

pub(crate) fn apply_destroy(
    ctx: &mut ApplyCtx,
    world: &mut World,
    entity: Entity,
) -> Result<CommandOutcome, CommandError> {
    let building = current(world, entity)?;
    if is_main(world, entity, &building) {
        return Err(CommandError::BelowFloor {
            kind: building.kind,
        });
    }
    Ok(destroy(ctx, world, entity, &building))
}

pub(crate) fn apply_weaken(
    ctx: &mut ApplyCtx,
    world: &mut World,
    entity: Entity,
) -> Result<CommandOutcome, CommandError> {
    let building = current(world, entity)?;
    if building.level <= 1 {
        return Ok(CommandOutcome::Unchanged);
    }
    Ok(lower(ctx, world, entity, &building))
}

pub(crate) fn apply_credit(world: &mut World, amounts: &ResourceBundle) -> CommandOutcome {
    let mut ledger = world.resource_mut::<EcsLedger>();
    for (kind, amount) in amounts.iter() {
        ledger.0.credit(kind, amount);
    }
    tracing::debug!(?amounts, "production credited");
    CommandOutcome::Unchanged
}

fn lower(
    ctx: &mut ApplyCtx,
    world: &mut World,
    entity: Entity,
    building: &Building,
) -> CommandOutcome {
    let level = building.level - 1;
    set_level(world, entity, level);

    let event_id = ctx.record(
        EventKind::Downgrade,
        format!("{} dropped to level {level}", building.kind),
        serde_json::json!({
            "building": building.id,
            "kind": building.kind,
            "level": level,
        }),
    );
    tracing::info!(building = building.id, kind = %building.kind, level, "building downgraded");
    ctx.emit(GameEvent::BuildingDowngraded {
        event_id,
        building: entity,
        level,
    });
    CommandOutcome::Downgraded { level }
}

fn destroy(
    ctx: &mut ApplyCtx,
    world: &mut World,
    entity: Entity,
    building: &Building,
) -> CommandOutcome {
    if let Err(err) = world.resource_mut::<EcsTileGrid>().clear(building.tile) {
        tracing::warn!(building = building.id, tile = %building.tile, %err, "tile was not held by building");
    }
    world.resource_mut::<BuildingIndex>().remove(building.id);
    let visual = world
        .get_mut::<Visual>(entity)
        .and_then(|mut v| v.handle.take());
    world.despawn(entity);

    let event_id = ctx.record(
        EventKind::Destruction,
        format!("{} on tile {} was destroyed", building.kind, building.tile),
        serde_json::json!({
            "building": building.id,
            "kind": building.kind,
            "tile": building.tile,
            "level": building.level,
        }),
    );
    tracing::info!(building = building.id, kind = %building.kind, "building destroyed");
    ctx.emit(GameEvent::BuildingDestroyed {
        event_id,
        building_id: building.id,
        tile: building.tile,
        visual,
    });
    CommandOutcome::Destroyed
}
