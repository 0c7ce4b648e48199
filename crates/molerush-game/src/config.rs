//! Match configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Difficulty;

/// Timing and tuning knobs for a match.
///
/// Defaults are the live game values. Tests inject shrunken timings so a
/// full match plays out in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Match length in seconds (`time_left` starts here).
    pub game_duration_secs: u32,

    /// Delay between a guest joining and the game starting.
    pub join_countdown: Duration,

    /// Delay between a bot being requested and the game starting.
    pub bot_countdown: Duration,

    /// How often the difficulty ramp advances.
    pub ramp_period: Duration,

    /// Time into the match at which tutorial phases 1 and 2 unlock.
    pub tutorial_thresholds: [Duration; 2],

    /// Bounds for the bot's decision interval. The actual period is
    /// drawn uniformly from this range once per match.
    pub bot_tick_min: Duration,
    pub bot_tick_max: Duration,

    /// Difficulty parameters at the start of a match.
    pub initial_difficulty: Difficulty,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            game_duration_secs: 60,
            join_countdown: Duration::from_secs(3),
            bot_countdown: Duration::from_secs(2),
            ramp_period: Duration::from_secs(15),
            tutorial_thresholds: [
                Duration::from_secs(10),
                Duration::from_secs(25),
            ],
            bot_tick_min: Duration::from_millis(600),
            bot_tick_max: Duration::from_millis(1200),
            initial_difficulty: Difficulty::default(),
        }
    }
}
