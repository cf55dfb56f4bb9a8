use bevy_ecs::component::Component;

use crate::ecs::collaborators::VisualHandle;
use crate::model::{BuildingKind, TileId};

/// Mutable per-instance building state. Static rules live in the catalog,
/// keyed by `kind`.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Building {
    /// Stable id handed to the renderer and used in pick results.
    pub id: u64,
    pub kind: BuildingKind,
    /// The tile this instance exclusively occupies.
    pub tile: TileId,
    pub level: u8,
    pub placed_ms: u64,
}

/// Renderer-side representation of a building, reacquired whenever the
/// shown level no longer matches the building's level.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct Visual {
    pub handle: Option<VisualHandle>,
    /// Level the current handle was loaded for; 0 before the first load.
    pub shown_level: u8,
}
