use bevy_ecs::resource::Resource;
use bevy_ecs::system::ResMut;

/// Game clock resource tracking simulated time and tick count.
///
/// Advances by `tick_ms` per tick. The `advance_clock` system moves the clock
/// forward at the end of each tick (in `GamePhase::Last`), so systems see the
/// time at the start of the tick.
#[derive(Resource, Debug, Clone)]
pub struct GameClock {
    pub elapsed_ms: u64,
    pub tick_count: u64,
    pub tick_ms: u64,
}

impl GameClock {
    pub fn new(tick_ms: u64) -> Self {
        Self {
            elapsed_ms: 0,
            tick_count: 0,
            tick_ms,
        }
    }

    /// Advance the clock by one tick.
    pub fn advance(&mut self) {
        self.elapsed_ms += self.tick_ms;
        self.tick_count += 1;
    }

    /// Time at the end of the current tick.
    pub fn tick_end_ms(&self) -> u64 {
        self.elapsed_ms + self.tick_ms
    }
}

/// Bevy system that advances the game clock by one tick.
pub fn advance_clock(mut clock: ResMut<GameClock>) {
    clock.advance();
}
