pub mod entity_map;
pub mod event_log;
pub mod game_resources;
pub mod tile_grid;

pub use entity_map::BuildingIndex;
pub use event_log::{EventLog, LogEntry};
pub use game_resources::{
    CommandMode, DisasterRng, EcsCatalog, EcsIdGenerator, EcsLedger, GameOutcome, GameSeed, Mode,
    distribute_rng,
};
pub use tile_grid::{EcsTileGrid, Tile};
