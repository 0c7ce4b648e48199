//! Core types for the molerush wire contract.
//!
//! Everything here travels as JSON between the server and a game client.
//! The wire shape is fixed by the browser client: each message is a flat
//! object with a snake_case `"type"` tag and camelCase payload fields
//! (`moleType`, `holeIndex`, `timeLeft`).

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Board constants
// ---------------------------------------------------------------------------

/// Number of hole slots on the board. Fixed by the client layout.
pub const HOLE_COUNT: usize = 7;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// One of the two participant roles in a match.
///
/// A room has exactly one `Host` (the creator) and at most one `Guest`
/// (a second human, or the scripted bot). The seat is the identity used
/// for scoring and event attribution — the server never attributes an
/// action to a connection, always to a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    Host,
    Guest,
}

impl Seat {
    /// The other seat at the table.
    pub fn opponent(self) -> Seat {
        match self {
            Seat::Host => Seat::Guest,
            Seat::Guest => Seat::Host,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::Host => write!(f, "host"),
            Seat::Guest => write!(f, "guest"),
        }
    }
}

/// A short human-typeable room code.
///
/// Four characters drawn from [`CODE_ALPHABET`]. Codes are generated by
/// the room registry, which guarantees uniqueness among live rooms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(pub String);

/// The alphabet room codes are drawn from.
///
/// Uppercase letters and digits with the visually ambiguous symbols
/// (`I`, `O`, `0`, `1`) removed, so codes survive being read aloud or
/// copied from a phone screen.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a room code in characters.
pub const CODE_LEN: usize = 4;

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Game vocabulary
// ---------------------------------------------------------------------------

/// The kind of mole occupying a hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoleKind {
    /// +10 points, cleared on the first hit.
    Normal,
    /// +10 on a seat's first hit (stays up), +20 on the second (cleared).
    Helmet,
    /// −5 points, cleared on any hit. Best left alone.
    Danger,
}

impl fmt::Display for MoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoleKind::Normal => write!(f, "normal"),
            MoleKind::Helmet => write!(f, "helmet"),
            MoleKind::Danger => write!(f, "danger"),
        }
    }
}

/// The score pair for a match. Danger moles make negatives possible.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub struct ScorePair {
    pub host: i32,
    pub guest: i32,
}

impl ScorePair {
    /// Returns a mutable reference to the given seat's score.
    pub fn seat_mut(&mut self, seat: Seat) -> &mut i32 {
        match seat {
            Seat::Host => &mut self.host,
            Seat::Guest => &mut self.guest,
        }
    }

    /// Returns the given seat's score.
    pub fn seat(&self, seat: Seat) -> i32 {
        match seat {
            Seat::Host => self.host,
            Seat::Guest => self.guest,
        }
    }
}

/// Final result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Host,
    Guest,
    Tie,
}

/// A normalized on-screen hand coordinate, relayed as telemetry.
///
/// Coordinates are in `[0, 1]` screen space. The server never interprets
/// these beyond relaying them (or synthesizing them for the bot).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandPos {
    pub x: f64,
    pub y: f64,
}

// ---------------------------------------------------------------------------
// Inbound messages (client → server)
// ---------------------------------------------------------------------------

/// Everything a client can send.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
/// `{ "type": "join_room", "code": "ABCD" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Allocate a room and become its host.
    CreateRoom,

    /// Attach as guest to an existing, non-full room.
    JoinRoom { code: String },

    /// Claim a hit on hole `index`.
    Whack { index: usize },

    /// Raw hand telemetry, relayed verbatim to the opponent.
    HandPos { positions: Vec<HandPos> },

    /// Opaque peer-connection signaling payload, relayed verbatim.
    Signal { data: serde_json::Value },

    /// Host requests a bot opponent (only valid while the guest seat
    /// is empty).
    StartBot,
}

// ---------------------------------------------------------------------------
// Outbound messages (server → client)
// ---------------------------------------------------------------------------

/// Everything the server can send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Acknowledges `create_room` with the allocated code.
    RoomCreated { code: RoomCode },

    /// Acknowledges `join_room`.
    RoomJoined { code: RoomCode },

    /// Recoverable failure (unknown code, full room). The connection
    /// stays open for a retry.
    Error { message: String },

    /// A second participant took the guest seat.
    OpponentJoined,

    /// The other seat's connection closed. Terminal for the room.
    OpponentDisconnected,

    /// The host's bot request was accepted.
    BotActivated,

    /// The match is starting; tells the seat its assigned role.
    GameStart { role: Seat },

    /// A mole appeared.
    #[serde(rename_all = "camelCase")]
    SpawnMole { index: usize, mole_type: MoleKind },

    /// A hole emptied. `whacker` is present when a hit cleared it and
    /// absent when the mole simply expired.
    HideMole {
        index: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        whacker: Option<Seat>,
    },

    /// Visual-only notice that a helmet mole took its first hit.
    HelmetDamaged { index: usize },

    /// A scoring delta was applied.
    #[serde(rename_all = "camelCase")]
    ScoreUpdate {
        scores: ScorePair,
        whacker: Seat,
        hole_index: usize,
        points: i32,
        mole_type: MoleKind,
    },

    /// Countdown broadcast, 1 Hz while the match runs.
    #[serde(rename_all = "camelCase")]
    TimerSync { time_left: u32 },

    /// Terminal match summary.
    #[serde(rename_all = "camelCase")]
    GameOver {
        scores: ScorePair,
        time_left: u32,
        winner: Winner,
    },

    /// Relayed (or bot-synthesized) hand telemetry.
    OpponentHands { positions: Vec<HandPos> },

    /// Relayed peer-connection signaling payload.
    Signal { data: serde_json::Value },
}

// =========================================================================
// Tests
// =========================================================================
