use bevy_ecs::component::Component;

// ---------------------------------------------------------------------------
// Marker components
// ---------------------------------------------------------------------------

/// The single main building. Its floor level is 1 and it is never destroyed.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MainBuilding;
