use serde::{Deserialize, Serialize};

/// World-space position, used only to place visuals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPos {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn raised(self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }
}

/// Ground-plane anchor of an island's first tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IslandOrigin {
    pub x: f32,
    pub z: f32,
}

/// Index of a tile in the grid's fixed ordering (island, then row, then column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Grid coordinates of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub island: u8,
    pub row: u8,
    pub col: u8,
}

/// Layout of the archipelago.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Tiles per island side.
    pub grid_size: u8,
    /// World spacing between tile centres.
    pub tile_size: f32,
    pub tile_height: f32,
    pub islands: Vec<IslandOrigin>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            tile_size: 2.0,
            tile_height: 0.5,
            islands: vec![
                IslandOrigin { x: -25.0, z: -25.0 },
                IslandOrigin { x: 25.0, z: -25.0 },
                IslandOrigin { x: -25.0, z: 25.0 },
                IslandOrigin { x: 25.0, z: 25.0 },
                IslandOrigin { x: 0.0, z: 0.0 },
            ],
        }
    }
}

impl GridConfig {
    pub fn tiles_per_island(&self) -> u32 {
        u32::from(self.grid_size) * u32::from(self.grid_size)
    }

    pub fn tile_count(&self) -> u32 {
        self.tiles_per_island() * self.islands.len() as u32
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        usize::from(coord.island) < self.islands.len()
            && coord.row < self.grid_size
            && coord.col < self.grid_size
    }

    pub fn tile_id(&self, coord: TileCoord) -> Option<TileId> {
        self.contains(coord).then(|| {
            TileId(
                u32::from(coord.island) * self.tiles_per_island()
                    + u32::from(coord.row) * u32::from(self.grid_size)
                    + u32::from(coord.col),
            )
        })
    }

    /// Centre of the tile's top face.
    pub fn anchor(&self, coord: TileCoord) -> WorldPos {
        let origin = self.islands[usize::from(coord.island)];
        WorldPos::new(
            origin.x + f32::from(coord.col) * self.tile_size,
            self.tile_height / 2.0,
            origin.z + f32::from(coord.row) * self.tile_size,
        )
    }
}
