use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::ecs::components::{Building, MainBuilding, Visual};
use crate::ecs::resources::{BuildingIndex, EcsTileGrid};
use crate::model::{BuildingKind, CommandError, TileId};

/// Spawn a building entity, claim its tile and register it in the
/// `BuildingIndex`. Nothing is left behind if the tile cannot be claimed.
pub fn spawn_building(
    world: &mut World,
    id: u64,
    kind: BuildingKind,
    tile: TileId,
    level: u8,
    placed_ms: u64,
) -> Result<Entity, CommandError> {
    let entity = world
        .spawn((
            Building {
                id,
                kind,
                tile,
                level,
                placed_ms,
            },
            Visual::default(),
        ))
        .id();
    if let Err(err) = world.resource_mut::<EcsTileGrid>().assign(tile, entity) {
        world.despawn(entity);
        return Err(err);
    }
    world.resource_mut::<BuildingIndex>().insert(id, entity);
    Ok(entity)
}

/// Place the session's single main building at level 1, free of cost.
pub fn spawn_main_building(world: &mut World, id: u64, tile: TileId) -> Result<Entity, CommandError> {
    let entity = spawn_building(world, id, BuildingKind::MainBuilding, tile, 1, 0)?;
    world.entity_mut(entity).insert(MainBuilding);
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GridConfig;

    fn world() -> World {
        let mut world = World::new();
        world.insert_resource(EcsTileGrid::new(GridConfig::default()));
        world.insert_resource(BuildingIndex::new());
        world
    }

    #[test]
    fn spawned_building_is_registered() {
        let mut world = world();
        let entity = spawn_building(&mut world, 9, BuildingKind::House, TileId(12), 1, 0).unwrap();
        assert_eq!(world.resource::<BuildingIndex>().get_bevy(9), Some(entity));
        assert_eq!(
            world.resource::<EcsTileGrid>().get(TileId(12)).unwrap().occupant(),
            Some(entity)
        );
    }

    #[test]
    fn failed_claim_leaves_nothing() {
        let mut world = world();
        spawn_building(&mut world, 1, BuildingKind::House, TileId(12), 1, 0).unwrap();
        let err = spawn_building(&mut world, 2, BuildingKind::Quarry, TileId(12), 1, 0);
        assert_eq!(err, Err(CommandError::TileOccupied { tile: TileId(12) }));
        assert_eq!(world.resource::<BuildingIndex>().len(), 1);
        assert_eq!(world.query::<&Building>().iter(&world).count(), 1);
    }

    #[test]
    fn main_building_is_marked() {
        let mut world = world();
        let main = spawn_main_building(&mut world, 1, TileId(455)).unwrap();
        assert!(world.get::<MainBuilding>(main).is_some());
        assert_eq!(world.get::<Building>(main).unwrap().level, 1);
    }
}
