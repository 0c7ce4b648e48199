//! Wire protocol for the molerush session engine.
//!
//! This crate defines the message contract between the server and game
//! clients:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`Seat`],
//!   [`MoleKind`], etc.) — the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! The protocol layer sits between transport (raw frames) and the room
//! layer (game semantics). It knows nothing about connections, timers,
//! or rules — only shapes.

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    CODE_ALPHABET, CODE_LEN, ClientMessage, HOLE_COUNT, HandPos, MoleKind,
    RoomCode, ScorePair, Seat, ServerMessage, Winner,
};
