use bevy_ecs::system::Res;

use super::clock::GameClock;
use super::resources::GameOutcome;
use crate::config::GameConfig;

// Internal check function for testability.

/// True when `(start, start + tick]` contains a positive multiple of `period`.
fn period_crossed(start_ms: u64, tick_ms: u64, period_ms: u64) -> bool {
    if period_ms == 0 {
        return false;
    }
    (start_ms + tick_ms) / period_ms > start_ms / period_ms
}

// Bevy run condition functions (for use with `.run_if()`).

/// Fires on the tick that reaches each production period boundary.
pub fn production_due(clock: Res<GameClock>, config: Res<GameConfig>) -> bool {
    period_crossed(clock.elapsed_ms, clock.tick_ms, config.production_period_ms)
}

/// Fires on the tick that reaches each disaster period boundary.
pub fn disaster_due(clock: Res<GameClock>, config: Res<GameConfig>) -> bool {
    period_crossed(clock.elapsed_ms, clock.tick_ms, config.disaster_period_ms)
}

/// False once the main building has reached its maximum level.
pub fn game_running(outcome: Res<GameOutcome>) -> bool {
    !outcome.is_over()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_fires_on_first_tick() {
        assert!(!period_crossed(0, 50, 1000));
    }

    #[test]
    fn fires_on_tick_reaching_boundary() {
        assert!(period_crossed(950, 50, 1000));
        assert!(!period_crossed(1000, 50, 1000));
        assert!(period_crossed(1950, 50, 1000));
    }

    #[test]
    fn fires_once_per_period() {
        let fired = (0..200u64)
            .filter(|t| period_crossed(t * 50, 50, 1000))
            .count();
        assert_eq!(fired, 10);
    }

    #[test]
    fn uneven_tick_still_fires_once_per_period() {
        let fired = (0..100u64)
            .filter(|t| period_crossed(t * 30, 30, 1000))
            .count();
        // 3000 ms simulated
        assert_eq!(fired, 3);
    }

    #[test]
    fn zero_period_never_fires() {
        assert!(!period_crossed(0, 50, 0));
    }
}
