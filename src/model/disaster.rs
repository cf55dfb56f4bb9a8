use serde::{Deserialize, Serialize};

use super::catalog::BuildingKind;
use super::resource::ResourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DisasterKind {
    Meteorite,
    Thunder,
    Tornado,
    Earthquake,
}

string_enum!(DisasterKind {
    Meteorite => "meteorite",
    Thunder => "thunder",
    Tornado => "tornado",
    Earthquake => "earthquake",
});

/// What a strike does to its target when it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeEffect {
    /// Remove the building regardless of level. Never applies to the main building.
    Destroy,
    /// One level down; ordinary buildings at level 1 are destroyed.
    Downgrade,
    /// One level down with a floor of 1 for every kind.
    Weaken,
}

impl DisasterKind {
    pub fn effect(self) -> StrikeEffect {
        match self {
            DisasterKind::Meteorite => StrikeEffect::Destroy,
            DisasterKind::Thunder | DisasterKind::Tornado => StrikeEffect::Downgrade,
            DisasterKind::Earthquake => StrikeEffect::Weaken,
        }
    }

    /// Upper bound on targets per strike; `None` hits every eligible building.
    pub fn max_targets(self) -> Option<usize> {
        match self {
            DisasterKind::Meteorite | DisasterKind::Thunder => Some(1),
            DisasterKind::Tornado => Some(3),
            DisasterKind::Earthquake => None,
        }
    }

    /// Which buildings the disaster may select under `policy`.
    pub fn eligibility(self, policy: PolicySet) -> Eligibility {
        match (policy, self) {
            (PolicySet::Global, DisasterKind::Meteorite) => Eligibility::AllExceptMain,
            (PolicySet::Global, _) => Eligibility::All,
            (PolicySet::Categorized, DisasterKind::Meteorite) => Eligibility::Producers(&[
                ResourceKind::Wood,
                ResourceKind::Stone,
                ResourceKind::Iron,
            ]),
            (PolicySet::Categorized, DisasterKind::Thunder) => {
                Eligibility::Producers(&[ResourceKind::Iron, ResourceKind::Food])
            }
            (PolicySet::Categorized, DisasterKind::Tornado) => Eligibility::Producers(&[
                ResourceKind::Wood,
                ResourceKind::Stone,
                ResourceKind::Food,
            ]),
            (PolicySet::Categorized, DisasterKind::Earthquake) => Eligibility::All,
        }
    }
}

/// Which family of target-selection rules the disaster engine uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicySet {
    /// Any active building (meteorites spare the main building).
    #[default]
    Global,
    /// Only buildings producing particular resources.
    Categorized,
}

/// Target filter for one disaster kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    All,
    AllExceptMain,
    Producers(&'static [ResourceKind]),
}

impl Eligibility {
    pub fn admits(self, kind: BuildingKind, produces: Option<ResourceKind>) -> bool {
        match self {
            Eligibility::All => true,
            Eligibility::AllExceptMain => kind != BuildingKind::MainBuilding,
            Eligibility::Producers(kinds) => produces.is_some_and(|r| kinds.contains(&r)),
        }
    }
}

/// Visual-phase durations, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisasterTimings {
    pub meteorite_impact_ms: u64,
    pub thunder_impact_ms: u64,
    pub thunder_linger_ms: u64,
    pub tornado_impact_ms: u64,
    pub earthquake_impact_ms: u64,
}

impl Default for DisasterTimings {
    fn default() -> Self {
        Self {
            meteorite_impact_ms: 1000,
            thunder_impact_ms: 0,
            thunder_linger_ms: 500,
            tornado_impact_ms: 2000,
            earthquake_impact_ms: 0,
        }
    }
}

impl DisasterTimings {
    /// Time from strike start to the state change.
    pub fn impact_ms(&self, kind: DisasterKind) -> u64 {
        match kind {
            DisasterKind::Meteorite => self.meteorite_impact_ms,
            DisasterKind::Thunder => self.thunder_impact_ms,
            DisasterKind::Tornado => self.tornado_impact_ms,
            DisasterKind::Earthquake => self.earthquake_impact_ms,
        }
    }

    /// How long the effect visual stays after impact.
    pub fn linger_ms(&self, kind: DisasterKind) -> u64 {
        match kind {
            DisasterKind::Thunder => self.thunder_linger_ms,
            _ => 0,
        }
    }
}
