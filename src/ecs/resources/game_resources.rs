use std::hash::{DefaultHasher, Hash, Hasher};

use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;
use bevy_ecs::world::World;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::IdGenerator;
use crate::model::{BuildingCatalog, BuildingKind, Ledger};

/// The player's stockpile.
#[derive(Resource, Debug, Clone, Default)]
pub struct EcsLedger(pub Ledger);

/// Immutable building rules for the session.
#[derive(Resource, Debug, Clone, Default)]
pub struct EcsCatalog(pub BuildingCatalog);

/// Global ID generator for buildings and log entries.
#[derive(Resource, Default)]
pub struct EcsIdGenerator(pub IdGenerator);

/// Terminal state: set once, when the main building reaches its max level.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameOutcome {
    pub ended_at_ms: Option<u64>,
}

impl GameOutcome {
    pub fn is_over(&self) -> bool {
        self.ended_at_ms.is_some()
    }
}

/// Which pointer action the player is performing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Build,
    Upgrade,
}

/// Session-wide command state shared by the input systems and the GUI.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandMode {
    pub mode: Mode,
    /// Building kind to place on the next tile pick (Build mode only).
    pub selected: Option<BuildingKind>,
    /// Last building picked in Upgrade mode.
    pub hovered: Option<Entity>,
}

impl CommandMode {
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.selected = None;
        self.hovered = None;
    }

    pub fn select(&mut self, kind: BuildingKind) {
        if self.mode != Mode::Build {
            self.set_mode(Mode::Build);
        }
        self.selected = Some(kind);
    }
}

/// Session seed every per-domain RNG is derived from.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameSeed(pub u64);

/// Per-domain RNG for the disaster engine, reseeded every tick.
#[derive(Resource)]
pub struct DisasterRng(pub SmallRng);

impl Default for DisasterRng {
    fn default() -> Self {
        Self(SmallRng::seed_from_u64(0))
    }
}

/// Derive a deterministic per-domain seed from the global seed, domain name, and tick count.
fn derive_domain_seed(seed: u64, domain: &str, tick: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    domain.hash(&mut hasher);
    tick.hash(&mut hasher);
    hasher.finish()
}

/// Exclusive system that re-seeds the per-domain RNGs each tick.
/// Runs in `GamePhase::PreUpdate` before any domain systems.
pub fn distribute_rng(world: &mut World) {
    let seed = world.resource::<GameSeed>().0;
    let tick = world.resource::<crate::ecs::clock::GameClock>().tick_count;
    world.resource_mut::<DisasterRng>().0 =
        SmallRng::seed_from_u64(derive_domain_seed(seed, "disasters", tick));
}
