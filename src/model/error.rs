//! Error types for commands, configuration and collaborators.

use std::fmt;

use super::catalog::BuildingKind;
use super::grid::TileId;
use super::resource::ResourceKind;

/// A rejected build, upgrade or downgrade. Always non-fatal: the world is left
/// unchanged and the rejection is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// The target tile already hosts a building.
    TileOccupied { tile: TileId },
    /// No tile with this id exists in the grid.
    UnknownTile { tile: TileId },
    /// The referenced building no longer exists.
    UnknownBuilding,
    /// The kind has no entry in the loaded catalog.
    UnknownBuildingType(BuildingKind),
    /// The kind cannot be placed by a build command.
    NotBuildable(BuildingKind),
    /// The stockpile cannot cover the cost.
    InsufficientResources {
        kind: ResourceKind,
        required: u32,
        available: u32,
    },
    /// The building is already at its catalog maximum.
    MaxLevelReached { kind: BuildingKind, level: u8 },
    /// The building is at its floor level and cannot lose another level.
    BelowFloor { kind: BuildingKind },
    /// The session has reached its terminal state.
    GameOver,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::TileOccupied { tile } => write!(f, "tile {tile} already has a building"),
            CommandError::UnknownTile { tile } => write!(f, "no tile with id {tile}"),
            CommandError::UnknownBuilding => write!(f, "building no longer exists"),
            CommandError::UnknownBuildingType(kind) => write!(f, "{kind} is not in the catalog"),
            CommandError::NotBuildable(kind) => write!(f, "{kind} cannot be built"),
            CommandError::InsufficientResources {
                kind,
                required,
                available,
            } => write!(f, "not enough {kind}: need {required}, have {available}"),
            CommandError::MaxLevelReached { kind, level } => {
                write!(f, "{kind} is already at max level {level}")
            }
            CommandError::BelowFloor { kind } => write!(f, "{kind} cannot be downgraded further"),
            CommandError::GameOver => write!(f, "the game is over"),
        }
    }
}

impl std::error::Error for CommandError {}

/// Invalid game configuration or building catalog.
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Parse(serde_json::Error),
    /// A field holds a value outside its allowed range.
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "malformed configuration: {err}"),
            ConfigError::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// A model or sound could not be loaded by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLoadError {
    pub path: String,
    pub reason: String,
}

impl fmt::Display for AssetLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to load {}: {}", self.path, self.reason)
    }
}

impl std::error::Error for AssetLoadError {}
