//! Codec trait and the JSON implementation.
//!
//! A codec converts between wire types and raw bytes. The rest of the
//! stack only talks to the [`Codec`] trait, so the framing format is a
//! swappable strategy; JSON is the one format the API ships, chosen for
//! compatibility with the existing browser clients.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes wire types to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` because one codec instance is shared across
/// every connection task.
///
/// The methods are generic over the payload type rather than fixed to
/// [`Request`](crate::Request)/[`Reply`](crate::Reply): the server decodes
/// requests and encodes replies, clients and tests do the reverse, and
/// both go through the same two methods.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed,
    /// truncated, or don't match the expected shape.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] over `serde_json`.
///
/// Human-readable frames: inspectable in browser DevTools and in logs,
/// and directly consumable by JavaScript clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
