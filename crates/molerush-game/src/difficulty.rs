//! The difficulty ramp.
//!
//! Every ramp period the spawn window tightens and the danger-mole
//! probability rises, bounded so a match never becomes unplayable:
//! spawns never come faster than twice a second and dangers never
//! exceed 40% of spawns.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Hard floor for the minimum spawn delay, in seconds.
pub const MIN_SPAWN_FLOOR: f64 = 0.5;
/// Hard floor for the maximum spawn delay, in seconds.
pub const MAX_SPAWN_FLOOR: f64 = 1.0;
/// The spawn window never collapses below this width, in seconds.
pub const SPAWN_WINDOW_MIN: f64 = 0.1;
/// Ceiling for the danger-mole probability.
pub const DANGER_CAP: f64 = 0.4;

/// The three difficulty parameters of a match.
///
/// Invariants, upheld by [`ramp_step`](Self::ramp_step):
/// `danger_chance <= 0.4` and `max_spawn >= min_spawn + 0.1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Lower bound of the spawn delay window, seconds.
    pub min_spawn: f64,
    /// Upper bound of the spawn delay window, seconds.
    pub max_spawn: f64,
    /// Probability that a phase-2 spawn is a danger mole.
    pub danger_chance: f64,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            min_spawn: 1.0,
            max_spawn: 3.0,
            danger_chance: 0.2,
        }
    }
}

impl Difficulty {
    /// Advances the ramp by one step.
    pub fn ramp_step(&mut self) {
        self.min_spawn = (self.min_spawn - 0.1).max(MIN_SPAWN_FLOOR);
        self.max_spawn = (self.max_spawn - 0.15).max(MAX_SPAWN_FLOOR);
        if self.max_spawn < self.min_spawn + SPAWN_WINDOW_MIN {
            self.max_spawn = self.min_spawn + SPAWN_WINDOW_MIN;
        }
        self.danger_chance = (self.danger_chance + 0.02).min(DANGER_CAP);
    }

    /// Draws the delay until the next spawn, uniform over the current
    /// window.
    pub fn spawn_delay(&self, rng: &mut impl Rng) -> Duration {
        Duration::from_secs_f64(
            rng.random_range(self.min_spawn..self.max_spawn),
        )
    }
}
