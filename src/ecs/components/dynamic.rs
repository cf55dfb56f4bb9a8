use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;

use crate::ecs::collaborators::VisualHandle;
use crate::model::{DisasterKind, WorldPos};

/// Lifecycle of one disaster strike against one building.
///
/// `Pending → Animating → Committed | Aborted`. No state is mutated before
/// `Committed`; a strike whose target disappears while animating aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikePhase {
    Pending,
    Animating,
    Committed,
    Aborted,
}

/// An in-flight disaster strike, spawned as its own entity.
#[derive(Component, Debug, Clone)]
pub struct DisasterStrike {
    pub kind: DisasterKind,
    /// Log entry of the disaster this strike belongs to.
    pub event_id: u64,
    pub target: Entity,
    /// Building id of the target, kept for logging after the target is gone.
    pub target_id: u64,
    /// Where the effect visual is shown.
    pub position: WorldPos,
    pub started_ms: u64,
    pub impact_ms: u64,
    pub linger_ms: u64,
    pub phase: StrikePhase,
    /// When the strike committed or aborted.
    pub resolved_ms: Option<u64>,
}

impl DisasterStrike {
    /// Elapsed fraction of the visual phase, clamped to `[0, 1]`.
    pub fn progress(&self, now_ms: u64) -> f64 {
        if self.impact_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.started_ms) as f64;
        (elapsed / self.impact_ms as f64).min(1.0)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.phase, StrikePhase::Committed | StrikePhase::Aborted)
    }

    /// True once a resolved strike's effect has finished lingering.
    pub fn is_finished(&self, now_ms: u64) -> bool {
        self.resolved_ms
            .is_some_and(|at| now_ms >= at.saturating_add(self.linger_ms))
    }
}

/// Renderer handle for a strike's effect (meteor, lightning bolt, funnel).
#[derive(Component, Debug, Clone, Default)]
pub struct EffectVisual(pub Option<VisualHandle>);
