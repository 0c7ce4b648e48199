//! Match rules for molerush.
//!
//! This crate is the pure core of the session engine: hole grid, mole
//! lifecycles, scoring, the difficulty ramp, and the bot policy. It does
//! no I/O and owns no timers — randomness is injected and every rule is
//! deterministic under a seeded RNG, which is what makes the scoring
//! semantics testable without a running server.
//!
//! # Key types
//!
//! - [`MatchState`] — the authoritative state of one match
//! - [`GameConfig`] — timing and tuning knobs
//! - [`Difficulty`] — the ramped spawn/hazard parameters
//! - [`SpawnOutcome`] / [`WhackOutcome`] — decisions handed back to the
//!   room actor for broadcasting
//! - [`OpponentPolicy`] / [`ScriptedBot`] — the guest-seat bot

mod bot;
mod config;
mod difficulty;
mod spawn;
mod state;
mod whack;

pub use bot::{HOLE_ANCHORS, OpponentPolicy, ScriptedBot};
pub use config::GameConfig;
pub use difficulty::{
    DANGER_CAP, Difficulty, MAX_SPAWN_FLOOR, MIN_SPAWN_FLOOR,
    SPAWN_WINDOW_MIN,
};
pub use spawn::{DANGER_LIFESPAN, LIFESPAN_MAX, LIFESPAN_MIN, SpawnOutcome};
pub use state::{MatchState, Mole, MoleId};
pub use whack::WhackOutcome;
