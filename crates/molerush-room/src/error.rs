//! Error types for the room layer.

use molerush_protocol::RoomCode;

/// Errors that can occur during room operations.
///
/// All of these are recoverable from the client's point of view — the
/// router turns them into `error` messages and keeps the connection
/// open.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No live room has this code.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// The guest seat is already taken (or the match already started).
    #[error("room {0} is full")]
    Full(RoomCode),

    /// The room actor is gone — its command channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),
}
