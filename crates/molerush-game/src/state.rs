//! Authoritative per-match state.

use std::collections::HashMap;

use molerush_protocol::{HOLE_COUNT, MoleKind, ScorePair, Seat};

use crate::{Difficulty, GameConfig};

/// Identity of one mole appearance.
///
/// Ids increase monotonically within a match, so a scheduled expiry can
/// tell whether the slot still holds the mole it was armed for or a
/// successor that spawned after a hit cleared the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoleId(pub u64);

/// A mole currently occupying a hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mole {
    pub kind: MoleKind,
    pub id: MoleId,
}

/// Per-seat hit counters for one helmet mole instance.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct HitCounters {
    host: u32,
    guest: u32,
}

impl HitCounters {
    pub(crate) fn seat_mut(&mut self, seat: Seat) -> &mut u32 {
        match seat {
            Seat::Host => &mut self.host,
            Seat::Guest => &mut self.guest,
        }
    }
}

/// The full mutable state of one match.
///
/// Owned by exactly one room actor; nothing here is synchronized because
/// nothing here is shared.
#[derive(Debug)]
pub struct MatchState {
    pub scores: ScorePair,
    pub holes: [Option<Mole>; HOLE_COUNT],
    pub time_left: u32,
    pub active: bool,
    pub difficulty: Difficulty,
    /// 0, 1, or 2 — gates which mole kinds may spawn (see spawn module).
    pub tutorial_phase: u8,
    /// Hit counters for helmet moles, keyed by hole index. An entry is
    /// created on helmet spawn and dropped when the slot clears.
    pub(crate) helmet_hits: HashMap<usize, HitCounters>,
    next_mole_id: u64,
}

impl MatchState {
    /// Creates an idle (not yet started) match.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            scores: ScorePair::default(),
            holes: [None; HOLE_COUNT],
            time_left: config.game_duration_secs,
            active: false,
            difficulty: config.initial_difficulty,
            tutorial_phase: 0,
            helmet_hits: HashMap::new(),
            next_mole_id: 0,
        }
    }

    /// Resets every mutable field and marks the match active.
    pub fn start(&mut self, config: &GameConfig) {
        self.scores = ScorePair::default();
        self.holes = [None; HOLE_COUNT];
        self.time_left = config.game_duration_secs;
        self.active = true;
        self.difficulty = config.initial_difficulty;
        self.tutorial_phase = 0;
        self.helmet_hits.clear();
    }

    /// Advances the countdown by one second and returns the new value.
    ///
    /// Saturating, so a late tick can never push a negative value into
    /// a broadcast.
    pub fn tick_second(&mut self) -> u32 {
        self.time_left = self.time_left.saturating_sub(1);
        self.time_left
    }

    /// Unlocks a tutorial phase. Phases only move forward.
    pub fn advance_tutorial(&mut self, phase: u8) {
        if phase > self.tutorial_phase {
            self.tutorial_phase = phase;
        }
    }

    /// Indices of holes currently holding a mole.
    pub fn occupied(&self) -> Vec<usize> {
        (0..HOLE_COUNT)
            .filter(|&i| self.holes[i].is_some())
            .collect()
    }

    /// Puts a fresh mole into `index`, replacing any stale hit counters
    /// from the slot's previous occupant. Helmet moles start with zeroed
    /// per-seat counters.
    pub(crate) fn place(&mut self, index: usize, kind: MoleKind) -> MoleId {
        let id = MoleId(self.next_mole_id);
        self.next_mole_id += 1;
        self.holes[index] = Some(Mole { kind, id });
        self.helmet_hits.remove(&index);
        if kind == MoleKind::Helmet {
            self.helmet_hits.insert(index, HitCounters::default());
        }
        id
    }

    /// Applies a scheduled expiry.
    ///
    /// Returns `true` (and clears the slot) only if the slot still holds
    /// the exact mole instance the expiry was armed for. A slot cleared
    /// by a hit, or re-occupied by a later spawn, makes this a no-op.
    pub fn expire(&mut self, index: usize, id: MoleId) -> bool {
        match self.holes.get(index) {
            Some(Some(mole)) if mole.id == id => {
                self.holes[index] = None;
                self.helmet_hits.remove(&index);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> MatchState {
        let config = GameConfig::default();
        let mut state = MatchState::new(&config);
        state.start(&config);
        state
    }

    #[test]
    fn test_start_resets_everything() {
        let config = GameConfig::default();
        let mut state = MatchState::new(&config);
        state.start(&config);
        state.scores.host = 50;
        state.time_left = 3;
        state.tutorial_phase = 2;
        state.place(0, MoleKind::Helmet);

        state.start(&config);
        assert_eq!(state.scores, ScorePair::default());
        assert_eq!(state.time_left, 60);
        assert_eq!(state.tutorial_phase, 0);
        assert!(state.holes.iter().all(Option::is_none));
        assert!(state.helmet_hits.is_empty());
        assert!(state.active);
    }

    #[test]
    fn test_tick_second_saturates_at_zero() {
        let mut state = started();
        state.time_left = 1;
        assert_eq!(state.tick_second(), 0);
        assert_eq!(state.tick_second(), 0);
    }

    #[test]
    fn test_tutorial_phase_never_moves_backwards() {
        let mut state = started();
        state.advance_tutorial(2);
        state.advance_tutorial(1);
        assert_eq!(state.tutorial_phase, 2);
    }

    #[test]
    fn test_expire_clears_matching_instance() {
        let mut state = started();
        let id = state.place(3, MoleKind::Normal);
        assert!(state.expire(3, id));
        assert!(state.holes[3].is_none());
    }

    #[test]
    fn test_expire_ignores_superseded_instance() {
        let mut state = started();
        let stale = state.place(3, MoleKind::Normal);
        // A hit clears the slot and a new mole spawns into it before
        // the original expiry fires.
        state.holes[3] = None;
        let fresh = state.place(3, MoleKind::Helmet);

        assert!(!state.expire(3, stale));
        assert_eq!(state.holes[3].map(|m| m.id), Some(fresh));
        // The fresh mole's own expiry still works.
        assert!(state.expire(3, fresh));
    }

    #[test]
    fn test_expire_out_of_range_is_a_noop() {
        let mut state = started();
        assert!(!state.expire(99, MoleId(0)));
    }

    #[test]
    fn test_place_assigns_increasing_ids() {
        let mut state = started();
        let a = state.place(0, MoleKind::Normal);
        let b = state.place(1, MoleKind::Normal);
        assert!(b.0 > a.0);
    }
}
