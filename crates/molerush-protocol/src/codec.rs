//! Codec trait and the default JSON implementation.
//!
//! The rest of the server never calls `serde_json` directly — it goes
//! through [`Codec`], so a binary format could be swapped in without
//! touching the router or room layers.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Converts between message types and raw bytes.
///
/// `Send + Sync + 'static` because codecs are stored in long-lived
/// server state shared across Tokio tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// JSON is what the browser client speaks, and it keeps every message
/// inspectable in DevTools.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MoleKind, ServerMessage};

    #[test]
    fn test_json_codec_round_trip() {
        let codec = JsonCodec;
        let msg = ServerMessage::SpawnMole {
            index: 1,
            mole_type: MoleKind::Danger,
        };
        let bytes = codec.encode(&msg).unwrap();
        let decoded: ServerMessage = codec.decode(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_json_codec_decode_failure() {
        let codec = JsonCodec;
        let result: Result<ServerMessage, _> = codec.decode(b"{broken");
        assert!(result.is_err());
    }
}
