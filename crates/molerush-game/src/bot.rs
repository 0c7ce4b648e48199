//! The scripted bot opponent.
//!
//! The bot is a decision policy, not a second rules engine: whatever it
//! decides is applied through the same whack resolver as a human seat.
//! It also fakes hand telemetry so the host sees plausible motion
//! instead of moles popping on their own.

use molerush_protocol::{HOLE_COUNT, HandPos, MoleKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::Mole;

/// On-screen anchor for each hole, in normalized coordinates. Mirrors
/// the client's barrel layout.
pub const HOLE_ANCHORS: [HandPos; HOLE_COUNT] = [
    HandPos { x: 0.08, y: 0.28 },
    HandPos { x: 0.08, y: 0.62 },
    HandPos { x: 0.92, y: 0.28 },
    HandPos { x: 0.92, y: 0.62 },
    HandPos { x: 0.25, y: 0.82 },
    HandPos { x: 0.50, y: 0.85 },
    HandPos { x: 0.75, y: 0.82 },
];

/// Probability the bot acts at all on a tick with targets available.
const ACT_CHANCE: f64 = 0.8;
/// Probability the bot backs off after targeting a danger mole.
const DANGER_CAUTION: f64 = 0.9;
/// Hand telemetry jitter around the target anchor, per axis.
const HAND_JITTER: f64 = 0.05;

/// A guest-seat decision source driven by the room's tick.
///
/// Implementations must not touch match state — they observe holes and
/// name a target; the room applies it through the resolver.
pub trait OpponentPolicy: Send + 'static {
    /// Picks a hole to whack this tick, or `None` to sit it out.
    fn choose_target(
        &mut self,
        holes: &[Option<Mole>; HOLE_COUNT],
    ) -> Option<usize>;

    /// Synthesizes hand telemetry for a whack at `target`.
    fn hand_positions(&mut self, target: usize) -> [HandPos; 2];
}

/// The stock bot: imperfect on purpose.
///
/// Each tick it acts with 80% probability, picks a uniformly random
/// occupied hole, and abstains 90% of the time when the pick turns out
/// to be a danger mole.
pub struct ScriptedBot {
    rng: StdRng,
}

impl ScriptedBot {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic bot for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ScriptedBot {
    fn default() -> Self {
        Self::new()
    }
}

impl OpponentPolicy for ScriptedBot {
    fn choose_target(
        &mut self,
        holes: &[Option<Mole>; HOLE_COUNT],
    ) -> Option<usize> {
        let occupied: Vec<usize> = (0..HOLE_COUNT)
            .filter(|&i| holes[i].is_some())
            .collect();
        if occupied.is_empty() || !self.rng.random_bool(ACT_CHANCE) {
            return None;
        }

        let target = occupied[self.rng.random_range(0..occupied.len())];
        let kind = holes[target].map(|m| m.kind);
        if kind == Some(MoleKind::Danger)
            && self.rng.random_bool(DANGER_CAUTION)
        {
            return None;
        }
        Some(target)
    }

    fn hand_positions(&mut self, target: usize) -> [HandPos; 2] {
        let anchor = HOLE_ANCHORS[target];
        let mut hand = |rng: &mut StdRng| HandPos {
            x: anchor.x + rng.random_range(-HAND_JITTER..HAND_JITTER),
            y: anchor.y + rng.random_range(-HAND_JITTER..HAND_JITTER),
        };
        [hand(&mut self.rng), hand(&mut self.rng)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MoleId;

    fn board(occupied: &[(usize, MoleKind)]) -> [Option<Mole>; HOLE_COUNT] {
        let mut holes = [None; HOLE_COUNT];
        for (i, &(index, kind)) in occupied.iter().enumerate() {
            holes[index] = Some(Mole {
                kind,
                id: MoleId(i as u64),
            });
        }
        holes
    }

    #[test]
    fn test_bot_never_targets_an_empty_board() {
        let mut bot = ScriptedBot::seeded(1);
        let holes = board(&[]);
        for _ in 0..100 {
            assert_eq!(bot.choose_target(&holes), None);
        }
    }

    #[test]
    fn test_bot_only_targets_occupied_holes() {
        let mut bot = ScriptedBot::seeded(2);
        let holes =
            board(&[(1, MoleKind::Normal), (4, MoleKind::Helmet)]);
        for _ in 0..500 {
            if let Some(target) = bot.choose_target(&holes) {
                assert!(holes[target].is_some());
            }
        }
    }

    #[test]
    fn test_bot_skips_some_ticks() {
        // 80% act rate: across 1000 ticks on a safe board the bot must
        // both act and abstain.
        let mut bot = ScriptedBot::seeded(3);
        let holes = board(&[(0, MoleKind::Normal)]);
        let acted = (0..1000)
            .filter(|_| bot.choose_target(&holes).is_some())
            .count();
        assert!(acted > 600 && acted < 950, "acted {acted}/1000");
    }

    #[test]
    fn test_bot_mostly_avoids_danger_moles() {
        let mut bot = ScriptedBot::seeded(4);
        let holes = board(&[(2, MoleKind::Danger)]);
        let whacked = (0..1000)
            .filter(|_| bot.choose_target(&holes).is_some())
            .count();
        // 80% act × 10% follow-through ≈ 8%.
        assert!(whacked < 200, "whacked danger {whacked}/1000");
    }

    #[test]
    fn test_hand_positions_stay_near_the_anchor() {
        let mut bot = ScriptedBot::seeded(5);
        for target in 0..HOLE_COUNT {
            let anchor = HOLE_ANCHORS[target];
            for hand in bot.hand_positions(target) {
                assert!((hand.x - anchor.x).abs() <= HAND_JITTER);
                assert!((hand.y - anchor.y).abs() <= HAND_JITTER);
            }
        }
    }
}
