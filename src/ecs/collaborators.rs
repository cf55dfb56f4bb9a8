//! In-process interfaces to the rendering and audio collaborators.
//!
//! The core never renders or plays anything itself. It asks a
//! [`SceneRenderer`] to place and remove visuals and to resolve pointer
//! picks, and an [`AudioPlayer`] to play cues. Both are held as resources and
//! default to no-op implementations.

use bevy_ecs::resource::Resource;
use serde::{Deserialize, Serialize};

use crate::model::{AssetLoadError, DisasterKind, TileId, WorldPos};

/// Opaque renderer-owned handle for a placed visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// Everything the renderer needs to show a building at one level.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualRequest {
    pub asset_path: String,
    pub position: WorldPos,
    pub scale: f32,
}

/// Screen-space pointer position in normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

/// Nearest pickable thing under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    Tile(TileId),
    /// A building, by its stable id.
    Building(u64),
}

pub trait SceneRenderer: Send + Sync {
    fn place_visual(
        &mut self,
        building_id: u64,
        request: &VisualRequest,
    ) -> Result<VisualHandle, AssetLoadError>;

    fn remove_visual(&mut self, handle: VisualHandle);

    /// Show a disaster effect above `position`.
    fn place_effect(
        &mut self,
        kind: DisasterKind,
        position: WorldPos,
    ) -> Result<VisualHandle, AssetLoadError>;

    /// Spatial query used by the command layer.
    fn pick_at(&self, pointer: Pointer) -> Option<PickTarget>;
}

/// Named sound cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Build,
    Upgrade,
    Downgrade,
    Destroyed,
    Disaster(DisasterKind),
    Denied,
    Victory,
}

pub trait AudioPlayer: Send + Sync {
    fn play_sound(&mut self, cue: SoundCue);
}

/// Renderer resource used by the presentation systems.
#[derive(Resource)]
pub struct Renderer(pub Box<dyn SceneRenderer>);

impl Default for Renderer {
    fn default() -> Self {
        Self(Box::new(NullRenderer::default()))
    }
}

/// Audio resource used by the presentation systems.
#[derive(Resource)]
pub struct Audio(pub Box<dyn AudioPlayer>);

impl Default for Audio {
    fn default() -> Self {
        Self(Box::new(SilentAudio))
    }
}

/// Hands out handles without drawing anything; never picks.
#[derive(Debug, Default)]
pub struct NullRenderer {
    next_handle: u64,
}

impl NullRenderer {
    fn issue(&mut self) -> VisualHandle {
        self.next_handle += 1;
        VisualHandle(self.next_handle)
    }
}

impl SceneRenderer for NullRenderer {
    fn place_visual(
        &mut self,
        _building_id: u64,
        _request: &VisualRequest,
    ) -> Result<VisualHandle, AssetLoadError> {
        Ok(self.issue())
    }

    fn remove_visual(&mut self, _handle: VisualHandle) {}

    fn place_effect(
        &mut self,
        _kind: DisasterKind,
        _position: WorldPos,
    ) -> Result<VisualHandle, AssetLoadError> {
        Ok(self.issue())
    }

    fn pick_at(&self, _pointer: Pointer) -> Option<PickTarget> {
        None
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioPlayer for SilentAudio {
    fn play_sound(&mut self, _cue: SoundCue) {}
}
