use serde::{Deserialize, Serialize};

/// Category of an entry in the game's event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EventKind {
    WorldCreated,
    Construction,
    Upgrade,
    Downgrade,
    Destruction,
    DisasterStarted,
    DisasterAborted,
    CommandRejected,
    GameEnded,
}

string_enum!(EventKind {
    WorldCreated => "world_created",
    Construction => "construction",
    Upgrade => "upgrade",
    Downgrade => "downgrade",
    Destruction => "destruction",
    DisasterStarted => "disaster_started",
    DisasterAborted => "disaster_aborted",
    CommandRejected => "command_rejected",
    GameEnded => "game_ended",
});
