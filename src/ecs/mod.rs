pub mod app;
pub mod clock;
pub mod collaborators;
pub mod commands;
pub mod components;
pub mod conditions;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod schedule;
pub mod spawn;
pub mod systems;
pub mod test_helpers;

pub use app::{build_game_app, build_game_app_with_catalog, build_game_app_with_executor};
pub use clock::GameClock;
pub use collaborators::{
    Audio, AudioPlayer, NullRenderer, PickTarget, Pointer, Renderer, SceneRenderer, SilentAudio,
    SoundCue, VisualHandle, VisualRequest,
};
pub use commands::{
    CommandOutcome, CommandSource, GameCommand, GameCommandKind, apply_command, resolve_build,
    resolve_downgrade, resolve_upgrade,
};
pub use components::{Building, DisasterStrike, EffectVisual, MainBuilding, StrikePhase, Visual};
pub use conditions::{disaster_due, game_running, production_due};
pub use events::{GameEvent, PlayerInput, TriggerDisaster};
pub use plugin::GamePlugin;
pub use resources::{
    BuildingIndex, CommandMode, EcsCatalog, EcsLedger, EcsTileGrid, EventLog, GameOutcome,
    LogEntry, Mode, Tile,
};
pub use schedule::{DomainSet, GamePhase, GameTick, configure_game_schedule};
