//! Gravity timing and level policy.

use std::time::{Duration, Instant};

/// Time between automatic one-row descents: 1000 ms / level.
pub fn fall_interval(level: u32) -> Duration {
    Duration::from_millis(1000 / u64::from(level.max(1)))
}

/// True once at least one fall interval has elapsed since the last descent.
pub fn should_auto_descend(now: Instant, last_descent: Instant, level: u32) -> bool {
    now.saturating_duration_since(last_descent) >= fall_interval(level)
}

/// Level reached at `score`: a step function with thresholds 5k, 50k, 500k and 1M.
pub const fn level_for_score(score: u32) -> u32 {
    match score {
        0..5_000 => 1,
        5_000..50_000 => 2,
        50_000..500_000 => 3,
        500_000..1_000_000 => 4,
        _ => 5,
    }
}
