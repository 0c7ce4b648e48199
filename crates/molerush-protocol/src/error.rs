//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding messages.
///
/// Decode failures are expected in normal operation — clients can send
/// arbitrary bytes — and the router drops them silently rather than
/// treating them as faults.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a message into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (malformed or mistyped payload).
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
