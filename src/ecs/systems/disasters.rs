//! Disaster engine.
//!
//! Three chained systems (Disasters domain set):
//! 1. `roll_disasters`: periodic Bernoulli trial, then a uniform pick among
//!    the registered kinds
//! 2. `launch_disasters`: target selection and strike spawning for every
//!    rolled or manually requested disaster
//! 3. `progress_strikes`: advances each strike's visual phase and, at
//!    `t == 1`, issues exactly one Destroy/Downgrade/Weaken command
//!
//! Strikes never mutate buildings themselves. A strike whose target vanished
//! while it was animating aborts instead of committing.

use bevy_app::{App, Plugin};
use bevy_ecs::entity::Entity;
use bevy_ecs::message::{MessageReader, MessageWriter};
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Commands, Query, Res, ResMut};
use rand::Rng;
use rand::seq::index;

use crate::config::GameConfig;
use crate::ecs::clock::GameClock;
use crate::ecs::commands::{GameCommand, GameCommandKind};
use crate::ecs::components::{Building, DisasterStrike, StrikePhase};
use crate::ecs::conditions::{disaster_due, game_running};
use crate::ecs::events::{GameEvent, TriggerDisaster};
use crate::ecs::resources::{
    DisasterRng, EcsCatalog, EcsIdGenerator, EcsTileGrid, EventLog, GameOutcome,
};
use crate::ecs::schedule::{DomainSet, GameTick};
use crate::model::{BuildingCatalog, DisasterKind, EventKind, PolicySet, StrikeEffect, TileId};

pub struct DisastersPlugin;

impl Plugin for DisastersPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            GameTick,
            (
                roll_disasters.run_if(disaster_due).run_if(game_running),
                launch_disasters,
                progress_strikes,
            )
                .chain()
                .in_set(DomainSet::Disasters),
        );
    }
}

/// One building a disaster may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub id: u64,
    pub entity: Entity,
    pub tile: TileId,
}

/// Buildings `kind` may target under `policy`, in id order.
pub fn eligible_targets<'a>(
    kind: DisasterKind,
    policy: PolicySet,
    catalog: &BuildingCatalog,
    buildings: impl IntoIterator<Item = (Entity, &'a Building)>,
) -> Vec<Candidate> {
    let eligibility = kind.eligibility(policy);
    let mut candidates: Vec<Candidate> = buildings
        .into_iter()
        .filter(|(_, b)| {
            let produces = catalog.get(b.kind).and_then(|e| e.resource_type);
            eligibility.admits(b.kind, produces)
        })
        .map(|(entity, b)| Candidate {
            id: b.id,
            entity,
            tile: b.tile,
        })
        .collect();
    // Query order is not stable across runs; ids are.
    candidates.sort_by_key(|c| c.id);
    candidates
}

/// Draw up to `kind.max_targets()` distinct candidates uniformly without
/// replacement.
pub fn select_targets(
    kind: DisasterKind,
    candidates: &[Candidate],
    rng: &mut impl Rng,
) -> Vec<Candidate> {
    if candidates.is_empty() {
        return Vec::new();
    }
    match kind.max_targets() {
        None => candidates.to_vec(),
        Some(1) => vec![candidates[rng.random_range(0..candidates.len())]],
        Some(k) => index::sample(rng, candidates.len(), k.min(candidates.len()))
            .into_iter()
            .map(|i| candidates[i])
            .collect(),
    }
}

fn roll_disasters(
    mut rng: ResMut<DisasterRng>,
    config: Res<GameConfig>,
    mut triggers: MessageWriter<TriggerDisaster>,
) {
    if config.disasters.is_empty() || !rng.0.random_bool(config.disaster_probability) {
        tracing::debug!("disaster roll failed");
        return;
    }
    let kind = config.disasters[rng.0.random_range(0..config.disasters.len())];
    triggers.write(TriggerDisaster {
        kind,
        manual: false,
    });
}

#[allow(clippy::too_many_arguments)]
fn launch_disasters(
    mut triggers: MessageReader<TriggerDisaster>,
    buildings: Query<(Entity, &Building)>,
    catalog: Res<EcsCatalog>,
    config: Res<GameConfig>,
    clock: Res<GameClock>,
    grid: Res<EcsTileGrid>,
    outcome: Res<GameOutcome>,
    mut rng: ResMut<DisasterRng>,
    mut log: ResMut<EventLog>,
    mut id_gen: ResMut<EcsIdGenerator>,
    mut events: MessageWriter<GameEvent>,
    mut commands: Commands,
) {
    for trigger in triggers.read() {
        if outcome.is_over() {
            continue;
        }
        let kind = trigger.kind;
        let candidates = eligible_targets(kind, config.eligibility, &catalog.0, buildings.iter());
        let targets = select_targets(kind, &candidates, &mut rng.0);
        if targets.is_empty() {
            tracing::debug!(%kind, "no eligible targets, disaster skipped");
            continue;
        }

        let now = clock.elapsed_ms;
        let target_ids: Vec<u64> = targets.iter().map(|t| t.id).collect();
        let event_id = log.record(
            &mut id_gen.0,
            EventKind::DisasterStarted,
            now,
            format!("{kind} struck {} building(s)", targets.len()),
            serde_json::json!({
                "kind": kind,
                "targets": target_ids,
                "manual": trigger.manual,
            }),
        );
        tracing::info!(%kind, targets = targets.len(), manual = trigger.manual, "disaster started");
        events.write(GameEvent::DisasterStarted {
            event_id,
            kind,
            targets: targets.len(),
        });

        for target in targets {
            commands.spawn(DisasterStrike {
                kind,
                event_id,
                target: target.entity,
                target_id: target.id,
                position: grid.building_position(target.tile).unwrap_or_default(),
                started_ms: now,
                impact_ms: config.timings.impact_ms(kind),
                linger_ms: config.timings.linger_ms(kind),
                phase: StrikePhase::Pending,
                resolved_ms: None,
            });
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn progress_strikes(
    mut strikes: Query<&mut DisasterStrike>,
    buildings: Query<&Building>,
    clock: Res<GameClock>,
    outcome: Res<GameOutcome>,
    mut log: ResMut<EventLog>,
    mut id_gen: ResMut<EcsIdGenerator>,
    mut events: MessageWriter<GameEvent>,
    mut commands: MessageWriter<GameCommand>,
) {
    let now = clock.elapsed_ms;
    for mut strike in &mut strikes {
        if strike.is_resolved() {
            continue;
        }

        let target_alive = buildings
            .get(strike.target)
            .is_ok_and(|b| b.id == strike.target_id);
        if !target_alive || outcome.is_over() {
            strike.phase = StrikePhase::Aborted;
            strike.resolved_ms = Some(now);
            let reason = if target_alive { "game over" } else { "target gone" };
            let event_id = log.record(
                &mut id_gen.0,
                EventKind::DisasterAborted,
                now,
                format!("{} strike aborted: {reason}", strike.kind),
                serde_json::json!({
                    "kind": strike.kind,
                    "target": strike.target_id,
                    "caused_by": strike.event_id,
                }),
            );
            tracing::debug!(kind = %strike.kind, target = strike.target_id, reason, "strike aborted");
            events.write(GameEvent::StrikeAborted {
                event_id,
                kind: strike.kind,
                target_id: strike.target_id,
            });
            continue;
        }

        if strike.phase == StrikePhase::Pending {
            strike.phase = StrikePhase::Animating;
        }
        if strike.progress(now) < 1.0 {
            continue;
        }

        let building = strike.target;
        let effect = match strike.kind.effect() {
            StrikeEffect::Destroy => GameCommandKind::Destroy { building },
            StrikeEffect::Downgrade => GameCommandKind::Downgrade { building },
            StrikeEffect::Weaken => GameCommandKind::Weaken { building },
        };
        commands.write(GameCommand::disaster(effect, strike.kind, strike.event_id));
        strike.phase = StrikePhase::Committed;
        strike.resolved_ms = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::model::BuildingKind;

    fn building(id: u64, kind: BuildingKind) -> Building {
        Building {
            id,
            kind,
            tile: TileId(id as u32),
            level: 1,
            placed_ms: 0,
        }
    }

    fn entities(n: u32) -> Vec<Entity> {
        let mut world = bevy_ecs::world::World::new();
        (0..n).map(|_| world.spawn_empty().id()).collect()
    }

    fn town() -> Vec<Building> {
        vec![
            building(4, BuildingKind::MainBuilding),
            building(2, BuildingKind::Lumberyard),
            building(3, BuildingKind::Paddy),
            building(1, BuildingKind::IronMine),
            building(5, BuildingKind::House),
        ]
    }

    #[test]
    fn meteorite_spares_main_building() {
        let town = town();
        let ents = entities(town.len() as u32);
        let pairs = ents.iter().copied().zip(town.iter());
        let candidates = eligible_targets(
            DisasterKind::Meteorite,
            PolicySet::Global,
            &BuildingCatalog::standard(),
            pairs,
        );
        let ids: Vec<u64> = candidates.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 5]);
    }

    #[test]
    fn thunder_may_hit_main_building() {
        let town = town();
        let ents = entities(town.len() as u32);
        let candidates = eligible_targets(
            DisasterKind::Thunder,
            PolicySet::Global,
            &BuildingCatalog::standard(),
            ents.iter().copied().zip(town.iter()),
        );
        assert_eq!(candidates.len(), 5);
    }

    #[test]
    fn categorized_policy_filters_by_resource() {
        let town = town();
        let ents = entities(town.len() as u32);
        let candidates = eligible_targets(
            DisasterKind::Thunder,
            PolicySet::Categorized,
            &BuildingCatalog::standard(),
            ents.iter().copied().zip(town.iter()),
        );
        let ids: Vec<u64> = candidates.iter().map(|c| c.id).collect();
        // iron mine and paddy
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn tornado_draws_distinct_targets() {
        let town = town();
        let ents = entities(town.len() as u32);
        let candidates = eligible_targets(
            DisasterKind::Tornado,
            PolicySet::Global,
            &BuildingCatalog::standard(),
            ents.iter().copied().zip(town.iter()),
        );
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let mut ids: Vec<u64> = select_targets(DisasterKind::Tornado, &candidates, &mut rng)
                .iter()
                .map(|c| c.id)
                .collect();
            assert_eq!(ids.len(), 3);
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), 3);
        }
    }

    #[test]
    fn tornado_with_few_buildings_hits_all() {
        let town = town();
        let ents = entities(2);
        let candidates = eligible_targets(
            DisasterKind::Tornado,
            PolicySet::Global,
            &BuildingCatalog::standard(),
            ents.iter().copied().zip(town.iter()),
        );
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(select_targets(DisasterKind::Tornado, &candidates, &mut rng).len(), 2);
    }

    #[test]
    fn empty_candidate_set_selects_nothing() {
        let mut rng = SmallRng::seed_from_u64(7);
        assert!(select_targets(DisasterKind::Meteorite, &[], &mut rng).is_empty());
    }

    #[test]
    fn single_pick_is_roughly_uniform() {
        let town = town();
        let ents = entities(town.len() as u32);
        let candidates = eligible_targets(
            DisasterKind::Thunder,
            PolicySet::Global,
            &BuildingCatalog::standard(),
            ents.iter().copied().zip(town.iter()),
        );
        let mut rng = SmallRng::seed_from_u64(11);
        let mut hits = [0u32; 6];
        for _ in 0..5000 {
            let pick = select_targets(DisasterKind::Thunder, &candidates, &mut rng);
            hits[pick[0].id as usize] += 1;
        }
        for id in 1..=5 {
            assert!(hits[id] > 800 && hits[id] < 1200, "id {id} hit {} times", hits[id]);
        }
    }

    #[test]
    fn earthquake_hits_everything() {
        let town = town();
        let ents = entities(town.len() as u32);
        let candidates = eligible_targets(
            DisasterKind::Earthquake,
            PolicySet::Global,
            &BuildingCatalog::standard(),
            ents.iter().copied().zip(town.iter()),
        );
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(select_targets(DisasterKind::Earthquake, &candidates, &mut rng).len(), 5);
    }
}
