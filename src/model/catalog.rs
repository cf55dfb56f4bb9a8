use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::resource::{ResourceBundle, ResourceKind};

/// Catalog key selecting a building's static rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum BuildingKind {
    Lumberyard,
    Quarry,
    IronMine,
    House,
    Paddy,
    NuclearPlant,
    MainBuilding,
}

string_enum!(BuildingKind {
    Lumberyard => "lumberyard",
    Quarry => "quarry",
    IronMine => "iron_mine",
    House => "house",
    Paddy => "paddy",
    NuclearPlant => "nuclear_plant",
    MainBuilding => "main_building",
});

impl BuildingKind {
    /// Kinds the player can place with a build command.
    pub fn is_buildable(self) -> bool {
        self != BuildingKind::MainBuilding
    }
}

/// Renderer-only placement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualParams {
    /// Height above the tile surface.
    pub offset_y: f32,
    pub scale: f32,
}

impl Default for VisualParams {
    fn default() -> Self {
        Self {
            offset_y: 0.5,
            scale: 0.5,
        }
    }
}

/// Immutable per-kind rules shared by every instance of that kind.
///
/// `costs[i]` is the cost of reaching level `i + 1`: `costs[0]` is the build
/// cost and the upgrade from level `L` costs `costs[L]`. The maximum level is
/// `costs.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub resource_type: Option<ResourceKind>,
    pub costs: Vec<ResourceBundle>,
    #[serde(default)]
    pub generation_rates: Vec<u32>,
    #[serde(default)]
    pub model_paths: Vec<String>,
    #[serde(default)]
    pub visual: VisualParams,
}

impl CatalogEntry {
    pub fn max_level(&self) -> u8 {
        u8::try_from(self.costs.len()).unwrap_or(u8::MAX)
    }

    pub fn build_cost(&self) -> Option<&ResourceBundle> {
        self.costs.first()
    }

    /// Cost of going from `level` to `level + 1`, or `None` at max level.
    pub fn upgrade_cost(&self, level: u8) -> Option<&ResourceBundle> {
        if level >= self.max_level() {
            return None;
        }
        self.costs.get(usize::from(level))
    }

    /// Resource and amount credited per production tick at `level`.
    pub fn production_at(&self, level: u8) -> Option<(ResourceKind, u32)> {
        let kind = self.resource_type?;
        let rate = *self
            .generation_rates
            .get(usize::from(level.checked_sub(1)?))?;
        (rate > 0).then_some((kind, rate))
    }

    pub fn model_path(&self, level: u8) -> Option<&str> {
        self.model_paths
            .get(usize::from(level.checked_sub(1)?))
            .map(String::as_str)
    }

    fn validate(&self, kind: BuildingKind) -> Result<(), ConfigError> {
        let field = |name: &str| format!("catalog.{kind}.{name}");
        if self.costs.is_empty() {
            return Err(ConfigError::invalid(field("costs"), "at least one level is required"));
        }
        if self.costs.len() > usize::from(u8::MAX) {
            return Err(ConfigError::invalid(field("costs"), "too many levels"));
        }
        match self.resource_type {
            Some(_) if self.generation_rates.len() != self.costs.len() => {
                return Err(ConfigError::invalid(
                    field("generation_rates"),
                    format!(
                        "expected {} rates, found {}",
                        self.costs.len(),
                        self.generation_rates.len()
                    ),
                ));
            }
            None if !self.generation_rates.is_empty() => {
                return Err(ConfigError::invalid(
                    field("generation_rates"),
                    "rates given for a kind without resource_type",
                ));
            }
            _ => {}
        }
        if !self.model_paths.is_empty() && self.model_paths.len() != self.costs.len() {
            return Err(ConfigError::invalid(
                field("model_paths"),
                "one model path per level is required",
            ));
        }
        if self.visual.scale.is_nan() || self.visual.scale <= 0.0 {
            return Err(ConfigError::invalid(field("visual.scale"), "must be positive"));
        }
        Ok(())
    }
}

/// The full set of building rules, keyed by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingCatalog {
    entries: BTreeMap<BuildingKind, CatalogEntry>,
}

impl BuildingCatalog {
    pub fn get(&self, kind: BuildingKind) -> Option<&CatalogEntry> {
        self.entries.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = BuildingKind> + '_ {
        self.entries.keys().copied()
    }

    pub fn insert(&mut self, kind: BuildingKind, entry: CatalogEntry) {
        self.entries.insert(kind, entry);
    }

    /// Parse and validate a catalog document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let catalog: BuildingCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(main) = self.entries.get(&BuildingKind::MainBuilding) else {
            return Err(ConfigError::invalid(
                "catalog.main_building",
                "the main building entry is required",
            ));
        };
        // A session that starts at the final level would be won before it begins.
        if main.costs.len() < 2 {
            return Err(ConfigError::invalid(
                "catalog.main_building.costs",
                "the main building needs at least two levels",
            ));
        }
        for (kind, entry) in &self.entries {
            entry.validate(*kind)?;
        }
        Ok(())
    }

    /// The canonical catalog.
    pub fn standard() -> Self {
        use ResourceKind::{Humans, Iron, Stone, Wood};

        fn entry(
            resource_type: Option<ResourceKind>,
            costs: Vec<ResourceBundle>,
            generation_rates: Vec<u32>,
            model_paths: &[&str],
        ) -> CatalogEntry {
            CatalogEntry {
                resource_type,
                costs,
                generation_rates,
                model_paths: model_paths.iter().map(|p| (*p).to_string()).collect(),
                visual: VisualParams::default(),
            }
        }

        let mut entries = BTreeMap::new();
        entries.insert(
            BuildingKind::Lumberyard,
            entry(
                Some(Wood),
                vec![
                    ResourceBundle::from([(Wood, 10), (Stone, 5), (Humans, 1)]),
                    ResourceBundle::from([(Wood, 20), (Stone, 10)]),
                    ResourceBundle::from([(Wood, 40), (Stone, 20)]),
                ],
                vec![1, 2, 4],
                &[
                    "models/lumberyard_1.gltf",
                    "models/lumberyard_2.gltf",
                    "models/lumberyard_3.gltf",
                ],
            ),
        );
        entries.insert(
            BuildingKind::Quarry,
            entry(
                Some(Stone),
                vec![
                    ResourceBundle::from([(Wood, 5), (Stone, 10), (Humans, 1)]),
                    ResourceBundle::from([(Wood, 10), (Stone, 20)]),
                    ResourceBundle::from([(Wood, 20), (Stone, 40)]),
                ],
                vec![1, 2, 3],
                &[
                    "models/quarry_1.gltf",
                    "models/quarry_2.gltf",
                    "models/quarry_3.gltf",
                ],
            ),
        );
        entries.insert(
            BuildingKind::IronMine,
            entry(
                Some(Iron),
                vec![
                    ResourceBundle::from([(Wood, 10), (Stone, 15), (Humans, 1)]),
                    ResourceBundle::from([(Wood, 20), (Stone, 30)]),
                    ResourceBundle::from([(Wood, 40), (Stone, 60)]),
                ],
                vec![1, 2, 3],
                &[
                    "models/iron_mine_1.gltf",
                    "models/iron_mine_2.gltf",
                    "models/iron_mine_3.gltf",
                ],
            ),
        );
        entries.insert(
            BuildingKind::House,
            entry(
                Some(Humans),
                vec![
                    ResourceBundle::from([(Wood, 10), (Stone, 5)]),
                    ResourceBundle::from([(Wood, 20), (Stone, 10)]),
                    ResourceBundle::from([(Wood, 40), (Stone, 20)]),
                ],
                vec![1, 2, 4],
                &[
                    "models/house_1.gltf",
                    "models/house_2.gltf",
                    "models/house_3.gltf",
                ],
            ),
        );
        entries.insert(
            BuildingKind::Paddy,
            entry(
                Some(ResourceKind::Food),
                vec![
                    ResourceBundle::from([(Wood, 5), (Stone, 5), (Humans, 1)]),
                    ResourceBundle::from([(Wood, 10), (Stone, 10)]),
                    ResourceBundle::from([(Wood, 20), (Stone, 20)]),
                ],
                vec![1, 2, 3],
                &[
                    "models/paddy_1.gltf",
                    "models/paddy_2.gltf",
                    "models/paddy_3.gltf",
                ],
            ),
        );
        entries.insert(
            BuildingKind::NuclearPlant,
            entry(
                Some(ResourceKind::Nuclear),
                vec![
                    ResourceBundle::from([(Wood, 20), (Stone, 50), (Iron, 30), (Humans, 1)]),
                    ResourceBundle::from([(Wood, 40), (Stone, 100), (Iron, 60)]),
                ],
                vec![1, 2],
                &["models/nuclear_plant_1.gltf", "models/nuclear_plant_2.gltf"],
            ),
        );
        entries.insert(
            BuildingKind::MainBuilding,
            entry(
                None,
                vec![
                    ResourceBundle::from([(Wood, 50), (Stone, 50)]),
                    ResourceBundle::from([(Wood, 100), (Stone, 100)]),
                    ResourceBundle::from([(Wood, 200), (Stone, 200)]),
                ],
                vec![],
                &[
                    "models/main_building_1.gltf",
                    "models/main_building_2.gltf",
                    "models/main_building_3.gltf",
                ],
            ),
        );
        Self { entries }
    }
}

impl Default for BuildingCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_is_valid() {
        BuildingCatalog::standard().validate().unwrap();
    }

    #[test]
    fn level_indexing() {
        let catalog = BuildingCatalog::standard();
        let lumberyard = catalog.get(BuildingKind::Lumberyard).unwrap();
        assert_eq!(lumberyard.max_level(), 3);
        assert_eq!(lumberyard.build_cost().unwrap().get(ResourceKind::Wood), 10);
        assert_eq!(lumberyard.upgrade_cost(1).unwrap().get(ResourceKind::Wood), 20);
        assert_eq!(lumberyard.upgrade_cost(2).unwrap().get(ResourceKind::Wood), 40);
        assert!(lumberyard.upgrade_cost(3).is_none());
    }

    #[test]
    fn production_follows_level() {
        let catalog = BuildingCatalog::standard();
        let lumberyard = catalog.get(BuildingKind::Lumberyard).unwrap();
        assert_eq!(lumberyard.production_at(1), Some((ResourceKind::Wood, 1)));
        assert_eq!(lumberyard.production_at(3), Some((ResourceKind::Wood, 4)));
        assert_eq!(lumberyard.production_at(0), None);

        let main = catalog.get(BuildingKind::MainBuilding).unwrap();
        assert_eq!(main.production_at(1), None);
    }

    #[test]
    fn nuclear_plant_has_two_levels() {
        let catalog = BuildingCatalog::standard();
        let plant = catalog.get(BuildingKind::NuclearPlant).unwrap();
        assert_eq!(plant.max_level(), 2);
        assert_eq!(plant.model_path(2), Some("models/nuclear_plant_2.gltf"));
        assert_eq!(plant.model_path(3), None);
    }

    #[test]
    fn catalog_round_trips_through_json() {
        let catalog = BuildingCatalog::standard();
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.contains("\"iron_mine\""));
        let back = BuildingCatalog::from_json_str(&json).unwrap();
        assert_eq!(back, catalog);
    }

    #[test]
    fn mismatched_rates_rejected() {
        let json = r#"{
            "main_building": {"costs": [{"wood": 1}, {"wood": 2}]},
            "quarry": {"resource_type": "stone", "costs": [{"wood": 5}, {"wood": 10}], "generation_rates": [1]}
        }"#;
        let err = BuildingCatalog::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("catalog.quarry.generation_rates"), "{err}");
    }

    #[test]
    fn single_level_main_building_rejected() {
        let json = r#"{"main_building": {"costs": [{"wood": 1}]}}"#;
        let err = BuildingCatalog::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("catalog.main_building.costs"), "{err}");

        let mut catalog = BuildingCatalog::standard();
        catalog
            .entries
            .get_mut(&BuildingKind::MainBuilding)
            .unwrap()
            .costs
            .truncate(1);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn missing_main_building_rejected() {
        let json = r#"{"house": {"resource_type": "humans", "costs": [{"wood": 5}], "generation_rates": [1]}}"#;
        assert!(BuildingCatalog::from_json_str(json).is_err());
    }

    #[test]
    fn unknown_resource_kind_rejected() {
        let json = r#"{"main_building": {"costs": [{"gold": 5}]}}"#;
        assert!(matches!(
            BuildingCatalog::from_json_str(json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn main_building_not_buildable() {
        assert!(!BuildingKind::MainBuilding.is_buildable());
        assert!(BuildingKind::House.is_buildable());
    }
}
