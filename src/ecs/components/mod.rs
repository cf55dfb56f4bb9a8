pub mod building;
pub mod common;
pub mod dynamic;

pub use building::{Building, Visual};
pub use common::MainBuilding;
pub use dynamic::{DisasterStrike, EffectVisual, StrikePhase};
