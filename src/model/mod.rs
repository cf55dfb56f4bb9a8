#[macro_use]
mod macros;

pub mod catalog;
pub mod disaster;
pub mod error;
pub mod event;
pub mod grid;
pub mod resource;

pub use catalog::{BuildingCatalog, BuildingKind, CatalogEntry, VisualParams};
pub use disaster::{DisasterKind, DisasterTimings, Eligibility, PolicySet, StrikeEffect};
pub use error::{AssetLoadError, CommandError, ConfigError};
pub use event::EventKind;
pub use grid::{GridConfig, IslandOrigin, TileCoord, TileId, WorldPos};
pub use resource::{Ledger, ResourceBundle, ResourceKind};
