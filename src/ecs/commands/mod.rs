pub mod applicator;
mod apply_buildings;

use bevy_ecs::entity::Entity;
use bevy_ecs::message::Message;

use crate::model::{BuildingKind, DisasterKind, ResourceBundle, TileId};

pub use applicator::{
    CommandOutcome, apply_command, apply_game_commands, resolve_build, resolve_downgrade,
    resolve_upgrade,
};

/// A command describing an intended state change to the ledger, the grid or a
/// building.
///
/// Systems emit these via `MessageWriter<GameCommand>`. The centralized
/// applicator in `GamePhase::PostUpdate` processes them one at a time: each
/// command re-validates its preconditions and mutates state in the same step,
/// records an audit entry in `EventLog`, and emits `GameEvent` messages.
#[derive(Message, Clone, Debug)]
pub struct GameCommand {
    /// The intent: what state change to apply.
    pub kind: GameCommandKind,
    pub source: CommandSource,
    /// Causal chain: event_id of the disaster that triggered this command.
    pub caused_by: Option<u64>,
}

impl GameCommand {
    pub fn player(kind: GameCommandKind) -> Self {
        Self {
            kind,
            source: CommandSource::Player,
            caused_by: None,
        }
    }

    pub fn economy(kind: GameCommandKind) -> Self {
        Self {
            kind,
            source: CommandSource::Economy,
            caused_by: None,
        }
    }

    pub fn disaster(kind: GameCommandKind, disaster: DisasterKind, event_id: u64) -> Self {
        Self {
            kind,
            source: CommandSource::Disaster(disaster),
            caused_by: Some(event_id),
        }
    }

    /// Bookkeeping commands change state without an EventLog entry.
    pub fn is_bookkeeping(&self) -> bool {
        matches!(self.kind, GameCommandKind::Credit { .. })
    }
}

/// Who issued a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandSource {
    Player,
    Economy,
    Disaster(DisasterKind),
}

/// All possible state-change intents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameCommandKind {
    /// Pay the level-1 cost and place a new building on an empty tile.
    Build { tile: TileId, kind: BuildingKind },
    /// Pay the next level's cost and raise the building one level.
    Upgrade { building: Entity },
    /// Lower one level; ordinary buildings at level 1 are destroyed.
    Downgrade { building: Entity },
    /// Remove an ordinary building outright, whatever its level.
    Destroy { building: Entity },
    /// Lower one level, never below level 1.
    Weaken { building: Entity },
    /// Add one production tick's output to the ledger.
    Credit { amounts: ResourceBundle },
}
