//! Error types for the protocol layer.
//!
//! These cover the mechanics of the wire format only — serialization and
//! framing. Application-level failures (validation, auth, not-found) are
//! not errors here; they travel *inside* a well-formed
//! [`Reply`](crate::Reply) as [`WireError`](crate::WireError) payloads.

/// Errors that can occur while encoding or decoding wire frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a wire type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed — malformed JSON, missing fields, or an
    /// unknown operation tag.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame parsed but violates protocol rules.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
