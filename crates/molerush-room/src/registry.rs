//! The live-room registry.
//!
//! Maps room codes to handles of running room actors. The registry is
//! plain data — the server wraps it in whatever synchronization its
//! accept loop needs, and each connection holds only the handle of the
//! room it is bound to.

use std::collections::HashMap;

use molerush_game::GameConfig;
use molerush_protocol::{CODE_ALPHABET, CODE_LEN, RoomCode};
use rand::Rng;

use crate::room::{RoomHandle, SeatSender, spawn_room};
use crate::RoomError;

/// Draws a random room code from the join-code alphabet.
fn random_code<R: Rng>(rng: &mut R) -> RoomCode {
    let code: String = (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    RoomCode(code)
}

/// Registry of live rooms.
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, RoomHandle>,
    config: GameConfig,
}

impl RoomRegistry {
    /// Creates an empty registry. Rooms created through it inherit
    /// `config`.
    pub fn new(config: GameConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            config,
        }
    }

    /// Spawns a new room with `host` in the host seat, under a code not
    /// currently in use.
    pub fn create(&mut self, host: SeatSender) -> RoomHandle {
        let code = loop {
            let candidate = random_code(&mut rand::rng());
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
        };

        let handle = spawn_room(code.clone(), self.config.clone(), host);
        self.rooms.insert(code.clone(), handle.clone());
        tracing::info!(room = %code, live = self.rooms.len(), "room created");
        handle
    }

    /// Looks up a live room by code.
    pub fn get(&self, code: &RoomCode) -> Result<RoomHandle, RoomError> {
        self.rooms
            .get(code)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(code.clone()))
    }

    /// Forgets a room. The actor itself stops when its last connection
    /// reports a disconnect.
    pub fn remove(&mut self, code: &RoomCode) {
        if self.rooms.remove(code).is_some() {
            tracing::info!(room = %code, live = self.rooms.len(), "room removed");
        }
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether no rooms are live.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
