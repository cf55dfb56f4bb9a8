//! Economy scheduler.
//!
//! One periodic system (Economy domain set):
//! 1. `produce_resources`: sums every active building's output into one
//!    credit command

use std::collections::BTreeMap;

use bevy_app::{App, Plugin};
use bevy_ecs::message::MessageWriter;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Query, Res};

use crate::ecs::commands::{GameCommand, GameCommandKind};
use crate::ecs::components::Building;
use crate::ecs::conditions::{game_running, production_due};
use crate::ecs::resources::EcsCatalog;
use crate::ecs::schedule::{DomainSet, GameTick};
use crate::model::{BuildingCatalog, ResourceBundle, ResourceKind};

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            GameTick,
            produce_resources
                .run_if(production_due)
                .run_if(game_running)
                .in_set(DomainSet::Economy),
        );
    }
}

/// Total output of `buildings` for one production tick. Order-independent.
pub fn production_totals<'a>(
    catalog: &BuildingCatalog,
    buildings: impl IntoIterator<Item = &'a Building>,
) -> ResourceBundle {
    let mut totals: BTreeMap<ResourceKind, u32> = BTreeMap::new();
    for building in buildings {
        let Some((kind, rate)) = catalog
            .get(building.kind)
            .and_then(|entry| entry.production_at(building.level))
        else {
            continue;
        };
        let total = totals.entry(kind).or_default();
        *total = total.saturating_add(rate);
    }
    totals
        .into_iter()
        .fold(ResourceBundle::new(), |bundle, (kind, amount)| {
            bundle.with(kind, amount)
        })
}

fn produce_resources(
    buildings: Query<&Building>,
    catalog: Res<EcsCatalog>,
    mut commands: MessageWriter<GameCommand>,
) {
    // Nothing in Update mutates buildings, so the query is a stable snapshot.
    let amounts = production_totals(&catalog.0, buildings.iter());
    if amounts.is_empty() {
        return;
    }
    commands.write(GameCommand::economy(GameCommandKind::Credit { amounts }));
}
