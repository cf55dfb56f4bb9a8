use bevy_app::App;
use bevy_ecs::message::Messages;

use crate::ecs::clock::GameClock;
use crate::ecs::events::PlayerInput;
use crate::ecs::schedule::GameTick;

/// Run `n` ticks.
pub fn tick_n(app: &mut App, n: u32) {
    for _ in 0..n {
        app.world_mut().run_schedule(GameTick);
    }
}

/// Run enough ticks to cover `ms` of simulated time, rounding up.
pub fn tick_ms(app: &mut App, ms: u64) {
    let tick = app.world().resource::<GameClock>().tick_ms.max(1);
    for _ in 0..ms.div_ceil(tick) {
        app.world_mut().run_schedule(GameTick);
    }
}

/// Queue player input for the next tick.
pub fn send_input(app: &mut App, input: PlayerInput) {
    app.world_mut()
        .resource_mut::<Messages<PlayerInput>>()
        .write(input);
}

/// Current simulated time in milliseconds.
pub fn now_ms(app: &App) -> u64 {
    app.world().resource::<GameClock>().elapsed_ms
}
