//! Codec trait and implementations for serializing/deserializing messages.
//!
//! The protocol layer doesn't care HOW messages are serialized; it needs
//! something that implements [`Codec`]. Two implementations ship:
//!
//! - [`BincodeCodec`]: compact binary, what actually goes on the wire.
//! - [`JsonCodec`]: human-readable, handy when logging or replaying
//!   captured envelopes.
//!
//! The same codec is used for the outer envelope and for the payload of
//! every individual call.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because the codec lives inside the session for
/// as long as the client does, and the client may be moved between tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value can't be represented
    /// in this format.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// BincodeCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses the `bincode` binary format.
///
/// Fixed-width integers, little endian. Decoding must consume every byte:
/// a sub-response with leftover bytes was produced for a different call,
/// so it is a decode error rather than a silently truncated value.
///
/// ```rust
/// use trailhead_protocol::{BincodeCodec, Codec, Position};
///
/// let codec = BincodeCodec;
/// let pos = Position::new(37.7749, -122.4194, 10.0);
/// let bytes = codec.encode(&pos).unwrap();
/// let back: Position = codec.decode(&bytes).unwrap();
/// assert_eq!(pos, back);
/// ```
#[cfg(feature = "bincode")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

#[cfg(feature = "bincode")]
impl BincodeCodec {
    fn options() -> impl bincode::Options {
        use bincode::Options;

        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .reject_trailing_bytes()
    }
}

#[cfg(feature = "bincode")]
impl Codec for BincodeCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        use bincode::Options;

        Self::options()
            .serialize(value)
            .map_err(|e| ProtocolError::Encode(e))
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        use bincode::Options;

        Self::options()
            .deserialize(data)
            .map_err(|e| ProtocolError::Decode(e))
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Larger than the binary format, but readable in logs and easy to
/// hand-edit when building fixtures.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(|e| ProtocolError::Encode(Box::new(e)))
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(|e| ProtocolError::Decode(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Call, RequestType};

    #[cfg(feature = "bincode")]
    #[test]
    fn test_bincode_decode_truncated_input_returns_decode_error() {
        let codec = BincodeCodec;
        let bytes = codec
            .encode(&Call::new(RequestType::GetPlayer, vec![1, 2, 3, 4]))
            .unwrap();

        let result: Result<Call, _> = codec.decode(&bytes[..bytes.len() - 2]);

        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[cfg(feature = "bincode")]
    #[test]
    fn test_bincode_unit_struct_encodes_to_nothing() {
        // Calls without arguments carry an empty payload on the wire.
        #[derive(Serialize)]
        struct NoArgs;
        assert!(BincodeCodec.encode(&NoArgs).unwrap().is_empty());
    }

    #[cfg(feature = "bincode")]
    #[test]
    fn test_bincode_decode_trailing_bytes_returns_decode_error() {
        // A longer message must not decode as a shorter one.
        let mut bytes = BincodeCodec.encode(&7u32).unwrap();
        bytes.extend_from_slice(&[0, 0, 0, 0]);

        let result: Result<u32, _> = BincodeCodec.decode(&bytes);

        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[cfg(feature = "bincode")]
    #[test]
    fn test_bincode_integers_are_fixed_width() {
        assert_eq!(BincodeCodec.encode(&1u32).unwrap(), vec![1, 0, 0, 0]);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_position_round_trips_full_precision() {
        use crate::Position;

        let pos = Position::new(37.77494306172844, -122.41936094738851, 10.0);

        let back: Position = JsonCodec.decode(&JsonCodec.encode(&pos).unwrap()).unwrap();

        assert_eq!(back, pos);
        assert_eq!(back.longitude.to_bits(), pos.longitude.to_bits());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_decode_garbage_returns_decode_error() {
        let result: Result<Call, _> = JsonCodec.decode(b"not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_call_uses_numeric_request_type() {
        let bytes = JsonCodec
            .encode(&Call::empty(RequestType::GetMapObjects))
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["kind"], 106);
    }
}
