use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, ScheduleLabel, SystemSet};

use super::clock::advance_clock;

/// Schedule label for the main game tick.
/// Run manually each tick via `app.world_mut().run_schedule(GameTick)`.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameTick;

/// Ordered phases within each game tick.
///
/// Phases run in declaration order: PreUpdate < Update < PostUpdate < Reactions < Last.
/// State changes are applied only in PostUpdate; Reactions drives the
/// renderer and audio collaborators from the results.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GamePhase {
    PreUpdate,
    Update,
    PostUpdate,
    Reactions,
    Last,
}

/// Per-domain system sets within `GamePhase::Update`.
///
/// ```text
/// Input → Economy → Disasters
/// ```
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainSet {
    Input,
    Economy,
    Disasters,
}

fn configure_domain_ordering(schedule: &mut Schedule) {
    schedule.configure_sets(
        (DomainSet::Input, DomainSet::Economy, DomainSet::Disasters)
            .chain()
            .in_set(GamePhase::Update),
    );
}

/// Build a configured `GameTick` schedule with phase ordering.
pub fn configure_game_schedule(executor: ExecutorKind) -> Schedule {
    let mut schedule = Schedule::new(GameTick);
    schedule.set_executor_kind(executor);
    schedule.configure_sets(
        (
            GamePhase::PreUpdate,
            GamePhase::Update,
            GamePhase::PostUpdate,
            GamePhase::Reactions,
            GamePhase::Last,
        )
            .chain(),
    );
    configure_domain_ordering(&mut schedule);
    schedule.add_systems(advance_clock.in_set(GamePhase::Last));
    schedule
}
