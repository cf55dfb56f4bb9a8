//! Session configuration.

use bevy_ecs::resource::Resource;
use serde::{Deserialize, Serialize};

use crate::model::{
    ConfigError, DisasterKind, DisasterTimings, GridConfig, PolicySet, ResourceBundle,
    ResourceKind, TileCoord,
};

/// Everything that parameterizes a session: timing, randomness, world layout
/// and starting stockpile. Missing JSON fields take their defaults.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: u64,
    /// Simulated milliseconds per `GameTick`.
    pub tick_ms: u64,
    pub production_period_ms: u64,
    pub disaster_period_ms: u64,
    /// Chance that a disaster roll produces a disaster.
    pub disaster_probability: f64,
    /// Kinds drawn uniformly on a successful roll.
    pub disasters: Vec<DisasterKind>,
    pub eligibility: PolicySet,
    pub timings: DisasterTimings,
    pub grid: GridConfig,
    pub starting_resources: ResourceBundle,
    pub main_building_tile: TileCoord,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_ms: 50,
            production_period_ms: 1000,
            disaster_period_ms: 10_000,
            disaster_probability: 0.5,
            disasters: vec![
                DisasterKind::Meteorite,
                DisasterKind::Thunder,
                DisasterKind::Tornado,
            ],
            eligibility: PolicySet::Global,
            timings: DisasterTimings::default(),
            grid: GridConfig::default(),
            starting_resources: ResourceBundle::from([
                (ResourceKind::Wood, 50),
                (ResourceKind::Stone, 30),
                (ResourceKind::Iron, 20),
                (ResourceKind::Humans, 10),
                (ResourceKind::Food, 40),
            ]),
            main_building_tile: TileCoord {
                island: 4,
                row: 5,
                col: 5,
            },
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::invalid("tick_ms", "must be positive"));
        }
        if self.production_period_ms < self.tick_ms {
            return Err(ConfigError::invalid(
                "production_period_ms",
                "must be at least one tick",
            ));
        }
        if self.disaster_period_ms < self.tick_ms {
            return Err(ConfigError::invalid(
                "disaster_period_ms",
                "must be at least one tick",
            ));
        }
        if !(0.0..=1.0).contains(&self.disaster_probability) {
            return Err(ConfigError::invalid(
                "disaster_probability",
                format!("{} is outside [0, 1]", self.disaster_probability),
            ));
        }
        if self.disasters.is_empty() {
            return Err(ConfigError::invalid(
                "disasters",
                "at least one disaster kind is required",
            ));
        }
        if self.grid.grid_size == 0 || self.grid.islands.is_empty() {
            return Err(ConfigError::invalid("grid", "the grid has no tiles"));
        }
        // Tile coordinates carry the island index as a u8.
        if self.grid.islands.len() > usize::from(u8::MAX) + 1 {
            return Err(ConfigError::invalid(
                "grid.islands",
                format!("{} islands exceeds the limit of 256", self.grid.islands.len()),
            ));
        }
        if self.grid.tile_size.is_nan() || self.grid.tile_size <= 0.0 {
            return Err(ConfigError::invalid("grid.tile_size", "must be positive"));
        }
        if !self.grid.contains(self.main_building_tile) {
            return Err(ConfigError::invalid(
                "main_building_tile",
                "lies outside the grid",
            ));
        }
        Ok(())
    }
}
