use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;

use crate::model::{CommandError, GridConfig, TileCoord, TileId, WorldPos};

/// One land cell. Created once at world build, never destroyed.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub id: TileId,
    pub coord: TileCoord,
    pub anchor: WorldPos,
    occupant: Option<Entity>,
}

impl Tile {
    pub fn occupant(&self) -> Option<Entity> {
        self.occupant
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// The fixed, ordered set of tiles across every island.
#[derive(Resource, Debug, Clone)]
pub struct EcsTileGrid {
    config: GridConfig,
    tiles: Vec<Tile>,
}

impl EcsTileGrid {
    pub fn new(config: GridConfig) -> Self {
        let mut tiles = Vec::with_capacity(config.tile_count() as usize);
        for island in 0..config.islands.len() {
            for row in 0..config.grid_size {
                for col in 0..config.grid_size {
                    let coord = TileCoord {
                        island: island as u8,
                        row,
                        col,
                    };
                    tiles.push(Tile {
                        id: TileId(tiles.len() as u32),
                        coord,
                        anchor: config.anchor(coord),
                        occupant: None,
                    });
                }
            }
        }
        Self { config, tiles }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn all_tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0 as usize)
    }

    pub fn at(&self, coord: TileCoord) -> Option<&Tile> {
        self.config.tile_id(coord).and_then(|id| self.get(id))
    }

    pub fn is_occupied(&self, id: TileId) -> bool {
        self.get(id).is_some_and(Tile::is_occupied)
    }

    /// Where a building's visual sits on this tile.
    pub fn building_position(&self, id: TileId) -> Option<WorldPos> {
        self.get(id)
            .map(|t| t.anchor.raised(self.config.tile_height))
    }

    pub fn assign(&mut self, id: TileId, building: Entity) -> Result<(), CommandError> {
        let tile = self
            .tiles
            .get_mut(id.0 as usize)
            .ok_or(CommandError::UnknownTile { tile: id })?;
        if tile.occupant.is_some() {
            return Err(CommandError::TileOccupied { tile: id });
        }
        tile.occupant = Some(building);
        Ok(())
    }

    /// Free the tile, returning its former occupant.
    pub fn clear(&mut self, id: TileId) -> Result<Entity, CommandError> {
        let tile = self
            .tiles
            .get_mut(id.0 as usize)
            .ok_or(CommandError::UnknownTile { tile: id })?;
        tile.occupant.take().ok_or(CommandError::UnknownBuilding)
    }

    pub fn occupied_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_occupied()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> EcsTileGrid {
        EcsTileGrid::new(GridConfig::default())
    }

    #[test]
    fn builds_every_tile_in_order() {
        let grid = grid();
        assert_eq!(grid.all_tiles().len(), 500);
        for (i, tile) in grid.all_tiles().iter().enumerate() {
            assert_eq!(tile.id, TileId(i as u32));
        }
        let centre = grid
            .at(TileCoord {
                island: 4,
                row: 5,
                col: 5,
            })
            .unwrap();
        assert_eq!(centre.anchor, WorldPos::new(10.0, 0.25, 10.0));
    }

    #[test]
    fn assign_then_clear() {
        let mut grid = grid();
        let building = Entity::PLACEHOLDER;
        grid.assign(TileId(3), building).unwrap();
        assert!(grid.is_occupied(TileId(3)));
        assert_eq!(grid.occupied_count(), 1);
        assert_eq!(grid.clear(TileId(3)), Ok(building));
        assert!(!grid.is_occupied(TileId(3)));
    }

    #[test]
    fn assign_occupied_fails() {
        let mut grid = grid();
        grid.assign(TileId(3), Entity::PLACEHOLDER).unwrap();
        assert_eq!(
            grid.assign(TileId(3), Entity::PLACEHOLDER),
            Err(CommandError::TileOccupied { tile: TileId(3) })
        );
    }

    #[test]
    fn clear_empty_fails() {
        let mut grid = grid();
        assert!(grid.clear(TileId(3)).is_err());
        assert_eq!(
            grid.clear(TileId(10_000)),
            Err(CommandError::UnknownTile {
                tile: TileId(10_000)
            })
        );
    }

    #[test]
    fn building_sits_above_tile() {
        let grid = grid();
        let pos = grid.building_position(TileId(0)).unwrap();
        assert_eq!(pos, WorldPos::new(-25.0, 0.75, -25.0));
    }
}
