//! The whack resolver.
//!
//! One entry point for scoring, used identically by human seats and the
//! bot — the two paths can never drift apart in rules.

use molerush_protocol::{MoleKind, Seat};

use crate::MatchState;

/// The result of applying a whack against the current hole state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhackOutcome {
    /// Empty or nonexistent hole. No score change, no broadcast —
    /// an expected race between the client's view and the server's.
    Miss,
    /// The whack connected.
    Hit {
        kind: MoleKind,
        /// Score delta applied to the acting seat (may be negative).
        points: i32,
        /// Whether the slot emptied.
        consumed: bool,
        /// Whether this was a helmet's first hit (visual-only notice).
        damaged: bool,
    },
}

impl MatchState {
    /// Applies `seat`'s claimed hit on hole `index`.
    ///
    /// Deterministic given the occupant and the seat's helmet hit count:
    /// - normal: +10, consumed
    /// - helmet, first hit by this seat: +10, stays up, damaged
    /// - helmet, second hit by this seat: +20, consumed
    /// - danger: −5, consumed
    pub fn resolve_whack(&mut self, seat: Seat, index: usize) -> WhackOutcome {
        let Some(Some(mole)) = self.holes.get(index).copied() else {
            return WhackOutcome::Miss;
        };

        let (points, consumed, damaged) = match mole.kind {
            MoleKind::Normal => (10, true, false),
            MoleKind::Helmet => {
                let hits = self
                    .helmet_hits
                    .entry(index)
                    .or_default()
                    .seat_mut(seat);
                *hits += 1;
                if *hits == 1 {
                    (10, false, true)
                } else {
                    (20, true, false)
                }
            }
            MoleKind::Danger => (-5, true, false),
        };

        *self.scores.seat_mut(seat) += points;
        if consumed {
            self.holes[index] = None;
            self.helmet_hits.remove(&index);
        }

        WhackOutcome::Hit {
            kind: mole.kind,
            points,
            consumed,
            damaged,
        }
    }
}
