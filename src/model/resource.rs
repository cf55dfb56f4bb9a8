use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::CommandError;

/// The fixed set of stockpiled resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ResourceKind {
    Wood,
    Stone,
    Iron,
    Humans,
    Food,
    Nuclear,
}

string_enum!(ResourceKind {
    Wood => "wood",
    Stone => "stone",
    Iron => "iron",
    Humans => "humans",
    Food => "food",
    Nuclear => "nuclear",
});

impl ResourceKind {
    pub const COUNT: usize = 6;

    fn index(self) -> usize {
        self as usize
    }
}

/// A sparse set of resource amounts: a build or upgrade cost, or a ledger delta.
///
/// Serializes as a plain map, e.g. `{"wood": 10, "stone": 5}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceBundle(BTreeMap<ResourceKind, u32>);

impl ResourceBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Zero amounts are dropped.
    pub fn with(mut self, kind: ResourceKind, amount: u32) -> Self {
        if amount > 0 {
            self.0.insert(kind, amount);
        }
        self
    }

    pub fn get(&self, kind: ResourceKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Entries in `ResourceKind` order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| *v == 0)
    }
}

impl<const N: usize> From<[(ResourceKind, u32); N]> for ResourceBundle {
    fn from(entries: [(ResourceKind, u32); N]) -> Self {
        entries
            .into_iter()
            .fold(Self::new(), |bundle, (kind, amount)| bundle.with(kind, amount))
    }
}

/// Player stockpile: one non-negative quantity per resource kind.
///
/// Storage is a fixed array indexed by kind, so a kind can never be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ledger {
    amounts: [u32; ResourceKind::COUNT],
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bundle(bundle: &ResourceBundle) -> Self {
        let mut ledger = Self::new();
        for (kind, amount) in bundle.iter() {
            ledger.amounts[kind.index()] = amount;
        }
        ledger
    }

    pub fn get(&self, kind: ResourceKind) -> u32 {
        self.amounts[kind.index()]
    }

    /// True iff every entry of `cost` is covered by the stockpile.
    pub fn can_afford(&self, cost: &ResourceBundle) -> bool {
        self.first_shortfall(cost).is_none()
    }

    /// The first kind (in `ResourceKind` order) the stockpile cannot cover.
    pub fn first_shortfall(&self, cost: &ResourceBundle) -> Option<CommandError> {
        cost.iter().find_map(|(kind, required)| {
            let available = self.get(kind);
            (available < required).then_some(CommandError::InsufficientResources {
                kind,
                required,
                available,
            })
        })
    }

    /// Afford-check and debit as a single step. Either every entry of `cost`
    /// is subtracted or nothing is.
    pub fn try_debit(&mut self, cost: &ResourceBundle) -> Result<(), CommandError> {
        if let Some(err) = self.first_shortfall(cost) {
            return Err(err);
        }
        for (kind, amount) in cost.iter() {
            self.amounts[kind.index()] -= amount;
        }
        Ok(())
    }

    pub fn credit(&mut self, kind: ResourceKind, amount: u32) {
        let slot = &mut self.amounts[kind.index()];
        *slot = slot.saturating_add(amount);
    }

    /// All quantities in `ResourceKind` order.
    pub fn entries(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        ResourceKind::ALL.iter().map(|k| (*k, self.get(*k)))
    }

    pub fn to_bundle(&self) -> ResourceBundle {
        self.entries()
            .fold(ResourceBundle::new(), |b, (kind, amount)| b.with(kind, amount))
    }
}
