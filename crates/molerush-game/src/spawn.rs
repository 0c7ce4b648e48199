//! The spawn engine: what appears where, and for how long.

use std::time::Duration;

use molerush_protocol::MoleKind;
use rand::Rng;

use crate::{MatchState, MoleId};

/// Fixed lifespan of a danger mole.
pub const DANGER_LIFESPAN: Duration = Duration::from_millis(2500);
/// Lifespan window for normal and helmet moles, in seconds.
pub const LIFESPAN_MIN: f64 = 1.5;
pub const LIFESPAN_MAX: f64 = 3.0;

/// One decided spawn: where, what, its identity, and when it should
/// auto-hide if nobody whacks it.
#[derive(Debug, Clone, Copy)]
pub struct SpawnOutcome {
    pub index: usize,
    pub kind: MoleKind,
    pub id: MoleId,
    pub lifespan: Duration,
}

impl MatchState {
    /// Spawns one mole into a uniformly chosen empty hole.
    ///
    /// Returns `None` without side effects when the grid is full — the
    /// caller reschedules regardless, so a full board just skips a beat.
    ///
    /// Kind selection is gated by the tutorial phase:
    /// - phase 0: always normal
    /// - phase 1: 50/50 normal/helmet
    /// - phase 2+: danger with probability `danger_chance`, and the
    ///   remainder split 55/45 between normal and helmet
    pub fn spawn_mole(&mut self, rng: &mut impl Rng) -> Option<SpawnOutcome> {
        let empties: Vec<usize> = (0..self.holes.len())
            .filter(|&i| self.holes[i].is_none())
            .collect();
        if empties.is_empty() {
            return None;
        }
        let index = empties[rng.random_range(0..empties.len())];

        let kind = match self.tutorial_phase {
            0 => MoleKind::Normal,
            1 => {
                if rng.random_bool(0.5) {
                    MoleKind::Normal
                } else {
                    MoleKind::Helmet
                }
            }
            _ => {
                if rng.random_bool(self.difficulty.danger_chance) {
                    MoleKind::Danger
                } else if rng.random_bool(0.55) {
                    MoleKind::Normal
                } else {
                    MoleKind::Helmet
                }
            }
        };

        let id = self.place(index, kind);
        let lifespan = if kind == MoleKind::Danger {
            DANGER_LIFESPAN
        } else {
            Duration::from_secs_f64(
                rng.random_range(LIFESPAN_MIN..LIFESPAN_MAX),
            )
        };

        Some(SpawnOutcome {
            index,
            kind,
            id,
            lifespan,
        })
    }
}
