use bevy_ecs::entity::Entity;
use bevy_ecs::message::Message;

use crate::ecs::collaborators::VisualHandle;
use crate::ecs::resources::Mode;
use crate::model::{BuildingKind, CommandError, DisasterKind, TileId};

/// Reactive events emitted by the command applicator and the disaster engine
/// for the presentation systems.
///
/// Each variant carries an `event_id` linking back to the EventLog entry that
/// caused it.
#[derive(Message, Clone, Debug)]
pub enum GameEvent {
    BuildingPlaced {
        event_id: u64,
        building: Entity,
        kind: BuildingKind,
        tile: TileId,
    },
    BuildingUpgraded {
        event_id: u64,
        building: Entity,
        level: u8,
    },
    BuildingDowngraded {
        event_id: u64,
        building: Entity,
        level: u8,
    },
    /// The entity is already despawned; `visual` is the handle it left behind.
    BuildingDestroyed {
        event_id: u64,
        building_id: u64,
        tile: TileId,
        visual: Option<VisualHandle>,
    },
    DisasterStarted {
        event_id: u64,
        kind: DisasterKind,
        targets: usize,
    },
    StrikeAborted {
        event_id: u64,
        kind: DisasterKind,
        target_id: u64,
    },
    /// A player command failed its precondition.
    CommandRejected {
        event_id: u64,
        error: CommandError,
    },
    GameEnded {
        event_id: u64,
    },
}

/// Pointer-level input from the host, after spatial picking.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerInput {
    SetMode(Mode),
    SelectBuildingType(BuildingKind),
    EnterUpgradeMode,
    TilePicked(TileId),
    BuildingPicked(Entity),
    TriggerDisaster(DisasterKind),
}

/// Request to run one disaster through target selection and striking.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerDisaster {
    pub kind: DisasterKind,
    /// Requested by the player rather than rolled by the scheduler.
    pub manual: bool,
}
