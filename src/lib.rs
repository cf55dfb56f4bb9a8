pub mod config;
pub mod ecs;
pub mod flush;
pub mod id;
pub mod model;
pub mod session;

pub use config::GameConfig;
pub use id::IdGenerator;
pub use model::{
    BuildingCatalog, BuildingKind, CommandError, ConfigError, DisasterKind, EventKind, Ledger,
    ResourceBundle, ResourceKind, TileCoord, TileId,
};
pub use session::GameSession;
